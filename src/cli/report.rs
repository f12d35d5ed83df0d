use std::path::PathBuf;

use crate::{
    cli::{display, pipeline},
    config::Settings,
    error::MelodyError,
    management::Session,
    openai::PromptKind,
    spotify, success, warning,
};

/// Options for a one-shot run.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub limit: u32,
    pub workers: usize,
    pub top_genres: usize,
    pub reflections: Vec<PromptKind>,
    pub export: Option<PathBuf>,
}

/// Logs in, builds the dataset, prints every view and the requested
/// reflections, then exits.
///
/// Login and fetch failures stop the run before anything is displayed. A
/// failed reflection is reported and the remaining ones still run.
pub async fn report(settings: &Settings, request: ReportRequest) -> Result<(), MelodyError> {
    let client = spotify::http_client(settings.http_timeout)?;
    let mut session = Session::new();

    pipeline::authenticate(&mut session, settings, &client).await?;
    pipeline::refresh_dataset(
        &mut session,
        settings,
        &client,
        request.limit,
        request.workers,
    )
    .await?;

    let Some(dataset) = session.dataset() else {
        return Err(MelodyError::AuthFlow("no dataset after fetch".to_string()));
    };

    display::show_tracks(dataset);
    display::show_timeline(dataset);
    display::show_genres(dataset, request.top_genres);

    if let Some(path) = &request.export {
        async_fs::write(path, dataset.to_json()?).await?;
        success!("Dataset written to {}", path.display());
    }

    for kind in request.reflections {
        match pipeline::reflect(dataset, settings, &client, kind).await {
            Ok(text) => display::show_reflection(kind, &text),
            Err(e) => warning!("{} failed: {}", kind, e),
        }
    }

    Ok(())
}

mod dataset;
mod session;

pub use dataset::TrackDataset;
pub use dataset::aggregate;
pub use dataset::genre_frequency;
pub use dataset::timeline_view;
pub use dataset::top_genres;
pub use dataset::track_descriptions;
pub use dataset::year_axis;
pub use session::Session;

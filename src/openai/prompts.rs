use std::fmt;

use clap::ValueEnum;

/// The kinds of reflection the language model can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PromptKind {
    /// A short poem inspired by the tracks
    Poem,
    /// An unusual travel destination that fits the tracks
    #[value(name = "travel")]
    TravelSuggestion,
    /// Historical background on the tracks
    #[value(name = "history")]
    HistoricalContext,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [
        PromptKind::Poem,
        PromptKind::TravelSuggestion,
        PromptKind::HistoricalContext,
    ];

    fn lead_in(self) -> &'static str {
        match self {
            PromptKind::Poem => {
                "Please write me a short poem of less than 12 lines, based on these recent songs I've listened to:"
            }
            PromptKind::TravelSuggestion => {
                "Please suggest an unusual travel destination for me, based on these recent songs I've listened to:"
            }
            PromptKind::HistoricalContext => {
                "Please give me some historical context about these recent songs I've listened to:"
            }
        }
    }

    fn closing(self) -> &'static str {
        match self {
            PromptKind::Poem => "Do not respond with anything else other than the poem.",
            PromptKind::TravelSuggestion => {
                "Respond with a location (city/town/region) and the country it's in. Suggest unusual destinations that are not incredibly popular, but are not unheard of. Provide some brief reasoning as to why it would be suitable given the songs I've listened to."
            }
            PromptKind::HistoricalContext => {
                "Respond with a quick overview of the songs, and then a 3 specific pieces of historical context, or interesting historical facts about the songs, such as what they reference, what they were inspired by, or how they were made"
            }
        }
    }

    /// Spinner text shown while the request is in flight.
    pub fn progress_message(self) -> &'static str {
        match self {
            PromptKind::Poem => "Retrieving your poem...",
            PromptKind::TravelSuggestion => "Retrieving your travel destination...",
            PromptKind::HistoricalContext => "Retrieving historical context...",
        }
    }

    /// Builds the user message: instruction, one track per line, closing
    /// instruction.
    pub fn build_prompt(self, track_descriptions: &[String]) -> String {
        format!(
            "{}\n{}\n{}",
            self.lead_in(),
            track_descriptions.join("\n"),
            self.closing()
        )
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self {
            PromptKind::Poem => "Poem",
            PromptKind::TravelSuggestion => "Travel suggestion",
            PromptKind::HistoricalContext => "Historical context",
        };
        f.write_str(title)
    }
}

use indoc::indoc;
use serde::Serialize;

/// What the assistant is being asked to do on this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Keep interviewing the reporter with follow-up questions.
    #[default]
    Interview = 0,
    /// Write the incident summary from the conversation so far.
    Summary = 1,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub directive: &'static str,
    pub parameters: GenerationParameters,
}

const TOP_P: f64 = 0.7;
const MAX_TOKENS: u32 = 1024;

const INTERVIEW_DIRECTIVE: &str = indoc! {"
    You are Rachael, a compassionate women's safety officer. Ask relevant \
    questions about the incident, keeping questions concise and sensitive. \
    Based on previous answers, ask appropriate follow-up questions to gather \
    important details about the incident."};

const SUMMARY_DIRECTIVE: &str = indoc! {"
    You are a professional incident report writer. Based on the conversation \
    history provided, create a clear, concise, and professional summary of the \
    incident. Focus on key details, timeline, and relevant information. Do not \
    include the conversation format in your summary."};

// Indexed by the `Mode` discriminant.
static PROFILES: [Profile; 2] = [
    Profile {
        directive: INTERVIEW_DIRECTIVE,
        parameters: GenerationParameters {
            temperature: 0.7,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        },
    },
    Profile {
        directive: SUMMARY_DIRECTIVE,
        parameters: GenerationParameters {
            temperature: 0.3,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        },
    },
];

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Interview, Mode::Summary];

    pub fn profile(self) -> &'static Profile {
        &PROFILES[self as usize]
    }

    pub fn directive(self) -> &'static str {
        self.profile().directive
    }

    pub fn parameters(self) -> GenerationParameters {
        self.profile().parameters
    }
}

impl From<bool> for Mode {
    fn from(is_summary_request: bool) -> Self {
        Mode::ALL[usize::from(is_summary_request)]
    }
}

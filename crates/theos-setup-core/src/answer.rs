pub const AFFIRMATIVE_TOKENS: [&str; 3] = ["y", "yes", "true"];
pub const NEGATIVE_TOKENS: [&str; 3] = ["n", "no", "false"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Affirmative,
    Negative,
    Unrecognized,
}

impl Answer {
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_ascii_lowercase();
        if AFFIRMATIVE_TOKENS.contains(&normalized.as_str()) {
            Self::Affirmative
        } else if NEGATIVE_TOKENS.contains(&normalized.as_str()) {
            Self::Negative
        } else {
            Self::Unrecognized
        }
    }

    // Anything that is not an explicit yes declines, typos included.
    pub fn is_affirmative(self) -> bool {
        self == Self::Affirmative
    }
}

pub fn is_affirmative(input: &str) -> bool {
    Answer::parse(input).is_affirmative()
}

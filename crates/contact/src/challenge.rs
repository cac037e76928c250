//! Human-verification challenge shown next to the contact form.

use rand::Rng;

pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const MIN_LEN: usize = 5;
pub const MAX_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    text: String,
}

impl Challenge {
    /// Generates a new challenge from the thread-local generator.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let len = rng.random_range(MIN_LEN..=MAX_LEN);
        let text = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();

        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returns true when `response` is non-empty and matches the challenge
/// ignoring case.
pub fn is_valid(challenge: &Challenge, response: &str) -> bool {
    !response.is_empty() && response.eq_ignore_ascii_case(&challenge.text)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub user_input: String,
    pub is_valid: bool,
}

/// A challenge together with what the user typed for it.
#[derive(Clone, Debug)]
pub struct Captcha {
    challenge: Challenge,
    response: ChallengeResponse,
}

impl Default for Captcha {
    fn default() -> Self {
        Self::new()
    }
}

impl Captcha {
    pub fn new() -> Self {
        Self::with_challenge(Challenge::generate())
    }

    pub fn with_challenge(challenge: Challenge) -> Self {
        Self {
            challenge,
            response: ChallengeResponse::default(),
        }
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn response(&self) -> &ChallengeResponse {
        &self.response
    }

    pub fn user_input(&self) -> &str {
        &self.response.user_input
    }

    pub fn is_valid(&self) -> bool {
        self.response.is_valid
    }

    /// Records the latest input and returns whether it solves the challenge.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        let user_input = text.into();
        let is_valid = is_valid(&self.challenge, &user_input);
        self.response = ChallengeResponse {
            user_input,
            is_valid,
        };

        is_valid
    }

    /// Replaces the challenge; any previous input is discarded.
    pub fn refresh(&mut self) -> &Challenge {
        self.replace(Challenge::generate())
    }

    pub fn replace(&mut self, challenge: Challenge) -> &Challenge {
        self.challenge = challenge;
        self.response = ChallengeResponse::default();

        &self.challenge
    }

    pub fn clear_response(&mut self) {
        self.response = ChallengeResponse::default();
    }
}

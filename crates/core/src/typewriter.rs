//! Typing effect for the hero subtitle.
//!
//! Each phrase is typed one character at a time, held fully typed, then
//! backspaced before the next phrase starts. The visible text is a pure
//! function of elapsed time, so any host clock can drive it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing and content of the typing effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub phrases: Vec<String>,
    /// Milliseconds per typed character.
    pub type_speed_ms: u64,
    /// Milliseconds per deleted character.
    pub back_speed_ms: u64,
    /// Milliseconds a fully typed phrase stays on screen before deleting.
    pub back_delay_ms: u64,
    /// Start over after the last phrase. When false the last phrase stays.
    pub repeat: bool,
    pub cursor: char,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Frontend Developer".to_string(),
                "WordPress Developer".to_string(),
                "React.js Specialist".to_string(),
            ],
            type_speed_ms: 50,
            back_speed_ms: 30,
            back_delay_ms: 1500,
            repeat: true,
            cursor: '▌',
        }
    }
}

/// What the typewriter is doing at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePhase {
    Typing,
    Holding,
    Deleting,
    /// Finished (non-repeating) or nothing to type.
    Done,
}

/// Visible state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeFrame<'a> {
    pub phrase: usize,
    pub text: &'a str,
    pub phase: TypePhase,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    fn phrase_len(&self, i: usize) -> u64 {
        self.config.phrases[i].chars().count() as u64
    }

    /// Length of one phrase's type, hold and delete cycle in milliseconds.
    fn phrase_cycle_ms(&self, i: usize) -> u64 {
        let n = self.phrase_len(i);
        n * self.config.type_speed_ms + self.config.back_delay_ms + n * self.config.back_speed_ms
    }

    /// Visible text at `elapsed` since the effect started.
    pub fn at(&self, elapsed: Duration) -> TypeFrame<'_> {
        let phrases = &self.config.phrases;
        if phrases.is_empty() {
            return TypeFrame {
                phrase: 0,
                text: "",
                phase: TypePhase::Done,
            };
        }

        let last = phrases.len() - 1;
        let total: u64 = (0..phrases.len()).map(|i| self.phrase_cycle_ms(i)).sum();
        let mut t = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        if self.config.repeat {
            if total == 0 {
                return self.frame(0, 0, TypePhase::Typing);
            }
            t %= total;
        }

        for i in 0..phrases.len() {
            let n = self.phrase_len(i);
            let typing = n * self.config.type_speed_ms;
            if t < typing {
                let shown = t / self.config.type_speed_ms.max(1);
                return self.frame(i, shown, TypePhase::Typing);
            }
            t -= typing;

            if i == last && !self.config.repeat {
                return self.frame(i, n, TypePhase::Done);
            }

            if t < self.config.back_delay_ms {
                return self.frame(i, n, TypePhase::Holding);
            }
            t -= self.config.back_delay_ms;

            let deleting = n * self.config.back_speed_ms;
            if t < deleting {
                let removed = t / self.config.back_speed_ms.max(1);
                return self.frame(i, n - removed, TypePhase::Deleting);
            }
            t -= deleting;
        }

        // Only reachable for a repeating cycle whose remainder landed on the boundary.
        self.frame(0, 0, TypePhase::Typing)
    }

    /// Visible text followed by the cursor character.
    pub fn render(&self, elapsed: Duration) -> String {
        let frame = self.at(elapsed);
        format!("{}{}", frame.text, self.config.cursor)
    }

    fn frame(&self, phrase: usize, chars: u64, phase: TypePhase) -> TypeFrame<'_> {
        let full = &self.config.phrases[phrase];
        let end = full
            .char_indices()
            .nth(chars as usize)
            .map_or(full.len(), |(idx, _)| idx);
        TypeFrame {
            phrase,
            text: &full[..end],
            phase,
        }
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(TypewriterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn short(repeat: bool) -> Typewriter {
        Typewriter::new(TypewriterConfig {
            phrases: vec!["ab".into(), "xyz".into()],
            type_speed_ms: 10,
            back_speed_ms: 5,
            back_delay_ms: 100,
            repeat,
            cursor: '|',
        })
    }

    #[test]
    fn starts_empty_and_types_one_char_per_interval() {
        let tw = short(true);
        assert_eq!(tw.at(ms(0)).text, "");
        assert_eq!(tw.at(ms(10)).text, "a");
        assert_eq!(tw.at(ms(19)).text, "a");
        assert_eq!(tw.at(ms(0)).phase, TypePhase::Typing);
    }

    #[test]
    fn holds_full_phrase_for_back_delay() {
        let tw = short(true);
        let hold_start = tw.at(ms(20));
        assert_eq!(hold_start.text, "ab");
        assert_eq!(hold_start.phase, TypePhase::Holding);
        assert_eq!(tw.at(ms(119)).phase, TypePhase::Holding);
    }

    #[test]
    fn deletes_then_moves_to_next_phrase() {
        let tw = short(true);
        let deleting = tw.at(ms(125));
        assert_eq!(deleting.phase, TypePhase::Deleting);
        assert_eq!(deleting.text, "a");
        let next = tw.at(ms(130));
        assert_eq!(next.phrase, 1);
        assert_eq!(next.text, "");
        assert_eq!(tw.at(ms(160)).text, "xyz");
    }

    #[test]
    fn repeating_wraps_to_first_phrase() {
        let tw = short(true);
        // cycle: "ab" = 20 + 100 + 10, "xyz" = 30 + 100 + 15
        let total = 130 + 145;
        assert_eq!(tw.at(ms(total)).phrase, 0);
        assert_eq!(tw.at(ms(total + 10)).text, "a");
    }

    #[test]
    fn non_repeating_keeps_last_phrase() {
        let tw = short(false);
        let end = tw.at(ms(10_000));
        assert_eq!(end.phrase, 1);
        assert_eq!(end.text, "xyz");
        assert_eq!(end.phase, TypePhase::Done);
    }

    #[test]
    fn empty_phrase_list_is_always_empty() {
        let tw = Typewriter::new(TypewriterConfig {
            phrases: vec![],
            ..TypewriterConfig::default()
        });
        let frame = tw.at(ms(5_000));
        assert_eq!(frame.text, "");
        assert_eq!(frame.phase, TypePhase::Done);
    }

    #[test]
    fn multibyte_characters_are_typed_whole() {
        let tw = Typewriter::new(TypewriterConfig {
            phrases: vec!["héllo".into()],
            type_speed_ms: 10,
            ..TypewriterConfig::default()
        });
        assert_eq!(tw.at(ms(20)).text, "hé");
    }

    #[test]
    fn render_appends_cursor() {
        let tw = short(true);
        assert_eq!(tw.render(ms(10)), "a|");
    }

    #[test]
    fn default_config_types_the_hero_phrases() {
        let tw = Typewriter::default();
        let full = tw.at(ms(18 * 50));
        assert_eq!(full.text, "Frontend Developer");
        assert_eq!(full.phase, TypePhase::Holding);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: TypewriterConfig =
            serde_json::from_str(r#"{"phrases": ["Rust"], "repeat": false}"#).unwrap();
        assert_eq!(config.phrases, vec!["Rust".to_string()]);
        assert_eq!(config.type_speed_ms, 50);
        assert!(!config.repeat);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn text_is_always_prefix_of_current_phrase(t in 0_u64..20_000) {
                let tw = Typewriter::default();
                let frame = tw.at(ms(t));
                let phrase = &tw.config().phrases[frame.phrase];
                prop_assert!(phrase.starts_with(frame.text));
            }
        }
    }
}

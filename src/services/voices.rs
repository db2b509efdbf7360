// SPDX-License-Identifier: MIT

//! Voice catalog.
//!
//! The demo backend does not run real synthesis; each voice carries a
//! sample URL that the completion step hands back as the job result.

use serde::Serialize;

/// A selectable TTS voice.
#[derive(Debug, Clone, Serialize)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
    pub sample_url: &'static str,
}

/// The fixed set of voices offered by the storefront.
pub const VOICES: &[Voice] = &[
    Voice {
        id: "vi-VN-Wavenet-A",
        name: "Wavenet A (Nữ)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Wavenet-A.wav",
    },
    Voice {
        id: "vi-VN-News-A",
        name: "News A (Nữ)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Wavenet-A.wav",
    },
    Voice {
        id: "vi-VN-Standard-A",
        name: "Standard A (Nữ)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Standard-A.wav",
    },
    Voice {
        id: "vi-VN-Standard-B",
        name: "Standard B (Nam)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Standard-B.wav",
    },
    Voice {
        id: "vi-VN-Standard-C",
        name: "Standard C (Nữ)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Standard-C.wav",
    },
    Voice {
        id: "vi-VN-Standard-D",
        name: "Standard D (Nam)",
        sample_url: "https://cloud.google.com/text-to-speech/docs/audio/vi-VN-Standard-D.wav",
    },
];

/// Look up a voice by its identifier.
pub fn find_voice(voice_id: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == voice_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_voice() {
        let voice = find_voice("vi-VN-Standard-A").expect("voice should exist");
        assert_eq!(voice.id, "vi-VN-Standard-A");
        assert!(voice
            .sample_url
            .starts_with("https://cloud.google.com/text-to-speech/docs/audio"));
    }

    #[test]
    fn test_unknown_voice_is_none() {
        assert!(find_voice("en-US-Wavenet-Z").is_none());
        assert!(find_voice("").is_none());
    }
}

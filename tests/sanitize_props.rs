//! Property tests for untrusted text handling and frame diffing.

use proptest::prelude::*;

use spark_prompt::text::is_control;
use spark_prompt::{diff_frames, sanitize, Cursor, Frame, Line, Sanitizer};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Text dense in escape-sequence fragments, so sequences are both complete
/// and cut short.
fn hostile_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("\x1b".to_string()),
        Just("\x1b[".to_string()),
        Just("\x1b]".to_string()),
        Just("\x1b\\".to_string()),
        Just("\x07".to_string()),
        Just("\r\n\t".to_string()),
        Just("\u{9b}".to_string()),
        "[0-9;?]{1,3}",
        "[a-zA-Z ]{1,4}",
        "[é日本🎉]{1,2}",
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

fn streamed(chunks: &[&str]) -> String {
    let mut sanitizer = Sanitizer::new();
    let mut out = String::new();
    for chunk in chunks {
        sanitizer.feed(chunk, &mut out);
    }
    sanitizer.finish(&mut out);
    out
}

// =============================================================================
// SANITIZER
// =============================================================================

proptest! {
    #[test]
    fn output_has_no_controls(text in hostile_text()) {
        let clean = sanitize(&text);
        prop_assert!(!clean.chars().any(is_control), "{clean:?}");
    }

    #[test]
    fn sanitizing_twice_changes_nothing(text in hostile_text()) {
        let once = sanitize(&text).into_owned();
        prop_assert_eq!(sanitize(&once), once.as_str());
    }

    #[test]
    fn chunking_does_not_matter(text in hostile_text(), cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..4)) {
        let mut bounds: Vec<usize> = cuts
            .iter()
            .map(|cut| cut.index(text.len() + 1))
            .filter(|&at| text.is_char_boundary(at))
            .collect();
        bounds.push(0);
        bounds.push(text.len());
        bounds.sort_unstable();
        bounds.dedup();
        let chunks: Vec<&str> = bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect();

        prop_assert_eq!(streamed(&chunks), sanitize(&text).into_owned());
    }
}

// =============================================================================
// DIFF
// =============================================================================

proptest! {
    #[test]
    fn identical_frames_write_nothing(rows in prop::collection::vec("[a-z 日]{0,12}", 1..4), width in 4usize..40) {
        let frame = Frame::new(rows.iter().map(|r| Line::plain(r)).collect(), Cursor::new(0, 0));
        let mut out = Vec::new();
        diff_frames(Some(&frame), &frame.clone(), width, &mut out).unwrap();
        prop_assert!(out.is_empty());
    }
}

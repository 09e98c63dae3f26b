use eyre::Result;

use crate::SubtitleSet;

/// Render subtitles as plain text (one segment per line, no timestamps)
pub fn render_text(set: &SubtitleSet) -> String {
    set.segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full subtitle set as pretty JSON
pub fn render_json(set: &SubtitleSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(set)?)
}

/// Render subtitles as SRT cues
pub fn render_srt(set: &SubtitleSet) -> String {
    let mut out = String::new();
    for (i, segment) in set.segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            srt_timestamp(segment.start),
            srt_timestamp(segment.end),
            segment.text
        ));
    }
    out
}

fn srt_timestamp(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    let h = millis / 3_600_000;
    let m = (millis % 3_600_000) / 60_000;
    let s = (millis % 60_000) / 1000;
    let ms = millis % 1000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

// src/enhance/template.rs

pub const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

const PLACEHOLDER: &str = "{prompt}";

const CAPTION_TEMPLATE: &str = "\
Transform the short prompt into a detailed video-generation caption using this structure:
Opening shot type (long/medium/close-up/extreme close-up/full shot)
Primary subject(s) with vivid attributes (colors, textures, actions, interactions)
Dynamic elements (movement, transitions, or changes over time, e.g., 'gradually lowers,' 'begins to climb,' 'camera moves toward...')
Scene composition (background, environment, spatial relationships)
Lighting/atmosphere (natural/artificial, time of day, mood)
Camera motion (zooms, pans, static/handheld shots) if applicable.

Pattern Summary from Examples:
[Shot Type] of [Subject+Action] + [Detailed Subject Description] + [Environmental Context] + [Lighting Conditions] + [Camera Movement]

One case:
Short prompt: a person is playing football
Long prompt: Medium shot of a young athlete in a red jersey sprinting across a muddy field, dribbling a soccer ball with precise footwork. The player glances toward the goalpost, adjusts their stance, and kicks the ball forcefully into the net. Raindrops fall lightly, creating reflections under stadium floodlights. The camera follows the ball's trajectory in a smooth pan.

Note: If the subject is stationary, incorporate camera movement to ensure the generated video remains dynamic.

Now expand this short prompt: [{prompt}]. Please only output the final long prompt in English.
";

/// Wrap the trimmed `prompt` in the caption-expansion instructions.
pub fn render(prompt: &str) -> String {
    CAPTION_TEMPLATE.replacen(PLACEHOLDER, prompt.trim(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_trimmed_and_bracketed() {
        let text = render("  a stop sign \n");
        assert!(text.contains("Now expand this short prompt: [a stop sign]."));
        assert!(!text.contains(PLACEHOLDER));
    }
}

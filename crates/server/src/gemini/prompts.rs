//! Prompt templates and image parameters per generation mode.
//!
//! Templates are assembled server-side so clients only send the raw user
//! prompt and a mode tag.

use character_studio_core::GenerationMode;

/// Requested output resolution for every mode.
pub const IMAGE_SIZE: &str = "2K";

/// Aspect ratio for a mode.
///
/// Storyboards and goods compositions are landscape; everything else is a
/// portrait sheet.
#[must_use]
pub const fn aspect_ratio(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::AniStoryboard | GenerationMode::Goods => "4:3",
        _ => "3:4",
    }
}

/// Whether a prompt contains Hangul.
///
/// Checks jamo and the precomposed syllable block; used to switch the
/// text-rendering instruction so labels come out in the user's language.
#[must_use]
pub fn contains_korean(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3131}'..='\u{314E}' | '\u{314F}'..='\u{3163}' | '\u{AC00}'..='\u{D7A3}')
    })
}

fn text_instruction(korean: bool) -> &'static str {
    if korean {
        "TEXT RENDERING: Vital. Render any text in clear, legible KOREAN (Hangul)."
    } else {
        "TEXT RENDERING: Render text in English."
    }
}

const CONSISTENCY_INSTRUCTION: &str = "\
[IMPORTANT: CONSISTENCY CHECK]
- A reference image of the character is provided.
- You MUST use this EXACT character design.
- Match colors, proportions, accessories, and style exactly.
- Do not redesign the character, just apply it to the new format below.
";

/// Build the full prompt for a fresh generation.
#[must_use]
pub fn generation_prompt(mode: GenerationMode, user_prompt: &str, has_reference: bool) -> String {
    let text = text_instruction(contains_korean(user_prompt));
    let consistency = if has_reference {
        CONSISTENCY_INSTRUCTION
    } else {
        ""
    };

    match mode {
        GenerationMode::AdStoryboard => format!(
            "You are an Expert Advertising Director. Generate a \"Commercial Ad Storyboard\".\n\
             {consistency}\n\
             Context/Scenario: {user_prompt}\n\n\
             [STYLE]\n\
             - Professional 4-panel vertical comic strip layout.\n\
             - Style: High-quality 3D Render or 2.5D Illustration (Webtoon style).\n\
             - Vibrant colors, dynamic lighting, persuasive visual flow.\n\n\
             [LAYOUT - 4 PANELS]\n\
             1. [Hook]: The character encountering a problem or a desire.\n\
             2. [Product Intro]: The character introducing the solution (product/service).\n\
             3. [Benefit]: The character enjoying the result (happy, satisfied).\n\
             4. [Call to Action]: The character pointing to the viewer with a slogan.\n\n\
             {text}"
        ),
        GenerationMode::AniStoryboard => format!(
            "You are a Lead Animation Director. Generate an \"Animation Storyboard\".\n\
             {consistency}\n\
             Action Sequence: {user_prompt}\n\n\
             [STYLE]\n\
             - Cinematic Aspect Ratio panels (16:9 frames stacked vertically).\n\
             - Style: Disney/Pixar concept art style.\n\
             - Focus on: Camera angles (Low angle, High angle), Action lines, facial expressions.\n\n\
             [LAYOUT]\n\
             - A sequence of 4-5 keyframes showing a specific action sequence.\n\
             - Include small directional arrows or motion blur to indicate movement.\n\
             - Lighting should set a dramatic mood.\n\n\
             {text}"
        ),
        GenerationMode::Goods => format!(
            "You are a Product Designer. Generate a \"Merchandise (Goods) Collection\".\n\
             {consistency}\n\
             Theme/Items: {user_prompt}\n\n\
             [STYLE]\n\
             - Photorealistic Studio Photography.\n\
             - Clean, pastel background.\n\
             - High-end commercial product shot.\n\n\
             [ITEMS TO SHOW]\n\
             Create a composition showing the character applied to:\n\
             1. Eco-bag (Tote bag)\n\
             2. Ceramic Mug\n\
             3. Smartphone Case\n\
             4. Enamel Pin / Keyring\n\n\
             Ensure the character is adapted to fit these items naturally \
             (e.g., as a pattern or a central print)."
        ),
        GenerationMode::Emoticon => format!(
            "You are an Emoticon/Sticker Artist. Generate a \"Digital Sticker Set\".\n\
             {consistency}\n\
             Theme/Emotion: {user_prompt}\n\n\
             [STYLE]\n\
             - KakaoTalk / Line Sticker style.\n\
             - Thick outlines (white border) for easy cutting.\n\
             - 2D or 3D Vector style (Clean, no noise).\n\n\
             [LAYOUT]\n\
             - Grid layout (3x3).\n\
             - 9 distinct emotions: Joy, Sadness, Anger, Love, Confusion, Sleepy, \
             Celebrating, Saying Hello, Saying No.\n\
             - Each sticker must be isolated with clear spacing.\n\n\
             {text}"
        ),
        GenerationMode::MovingEmoticon => format!(
            "You are a Game Asset Designer. Generate a \"Sprite Sheet\" for a Moving Emoticon.\n\
             {consistency}\n\
             Action Loop: {user_prompt}\n\n\
             [STYLE]\n\
             - Pixel Art or Clean Vector style.\n\
             - Uniform grid layout (4x4).\n\
             - Transparent or solid color background.\n\n\
             [CONTENT]\n\
             - Show ONE character performing a loopable animation \
             (e.g., Running, Jumping, or Waving).\n\
             - The 16 frames should represent a smooth sequence of motion from start to finish.\n\
             - Maintain strict consistency in character size and position across frames."
        ),
        GenerationMode::BrandSheet => format!(
            "You are an expert Character Designer. Generate a masterpiece quality \
             \"Character Brand Sheet\" for: {user_prompt}.\n\
             {consistency}\n\
             [ART DIRECTION & STYLE - UNIFORM QUALITY]\n\
             - Style: Premium 3D Art Toy, Vinyl Figure, Blind Box aesthetic (like Pop Mart).\n\
             - Rendering: Octane Render / Redshift style, Soft Studio Lighting, Global Illumination.\n\
             - Material: Matte finish with subtle subsurface scattering.\n\
             - Quality: 8k resolution details, sharp focus, no artifacts.\n\
             - CONSISTENCY: ALL sections must be fully rendered in 3D.\n\n\
             [COMPOSITION - 5 SECTION VERTICAL LAYOUT]\n\
             Strictly follow this layout from top to bottom:\n\
             1. [CHARACTER STORY]: Large Name & Backstory text ({text}).\n\
             2. [BASIC TYPE]: Hero Shot (Front 3/4 view).\n\
             3. [TURNAROUND]: Front, Side, Back views (3D Rendered).\n\
             4. [MOTION]: 4-5 spot illustrations of actions (3D Rendered).\n\
             5. [APPLICATION]: Laptop Stickers, Standee, Notebook mockups."
        ),
    }
}

/// Build the full prompt for an edit of an existing image.
///
/// The layout hint keeps the model from discarding the mode's composition
/// while applying the user's change.
#[must_use]
pub fn edit_prompt(mode: GenerationMode, instruction: &str) -> String {
    let context_hint = match mode {
        GenerationMode::AdStoryboard => "Maintain the 4-panel comic layout.",
        GenerationMode::Emoticon => "Maintain the grid layout of stickers.",
        GenerationMode::MovingEmoticon => "Maintain the sprite sheet grid.",
        _ => "Maintain the 5-section brand sheet layout.",
    };
    let text = if contains_korean(instruction) {
        "Ensure any new text or labels are rendered in clear KOREAN (Hangul)."
    } else {
        ""
    };

    format!(
        "Edit this image.\n\n\
         STRICT CONSTRAINTS:\n\
         - {context_hint}\n\
         - Keep the character consistent.\n\
         - Style: High-quality render.\n\
         - {text}\n\n\
         Edit instruction: {instruction}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_by_mode() {
        assert_eq!(aspect_ratio(GenerationMode::AniStoryboard), "4:3");
        assert_eq!(aspect_ratio(GenerationMode::Goods), "4:3");
        assert_eq!(aspect_ratio(GenerationMode::BrandSheet), "3:4");
        assert_eq!(aspect_ratio(GenerationMode::AdStoryboard), "3:4");
        assert_eq!(aspect_ratio(GenerationMode::Emoticon), "3:4");
        assert_eq!(aspect_ratio(GenerationMode::MovingEmoticon), "3:4");
    }

    #[test]
    fn test_contains_korean() {
        assert!(contains_korean("귀여운 고양이"));
        assert!(contains_korean("a cat named 냥이"));
        assert!(contains_korean("ㅋㅋ"));
        assert!(!contains_korean("a cute cat"));
        assert!(!contains_korean(""));
        // CJK ideographs are not Hangul.
        assert!(!contains_korean("可愛い猫"));
    }

    #[test]
    fn test_generation_prompt_embeds_user_text() {
        let prompt = generation_prompt(GenerationMode::BrandSheet, "a space corgi", false);
        assert!(prompt.contains("a space corgi"));
        assert!(prompt.contains("Character Brand Sheet"));
        assert!(prompt.contains("Render text in English"));
        assert!(!prompt.contains("CONSISTENCY CHECK"));
    }

    #[test]
    fn test_generation_prompt_korean_switches_instruction() {
        let prompt = generation_prompt(GenerationMode::Emoticon, "화난 토끼", false);
        assert!(prompt.contains("KOREAN (Hangul)"));
    }

    #[test]
    fn test_generation_prompt_reference_adds_consistency() {
        let prompt = generation_prompt(GenerationMode::Goods, "mugs", true);
        assert!(prompt.contains("CONSISTENCY CHECK"));
    }

    #[test]
    fn test_edit_prompt_layout_hints() {
        assert!(
            edit_prompt(GenerationMode::AdStoryboard, "make it blue")
                .contains("4-panel comic layout")
        );
        assert!(edit_prompt(GenerationMode::Emoticon, "make it blue").contains("grid layout"));
        assert!(
            edit_prompt(GenerationMode::MovingEmoticon, "make it blue")
                .contains("sprite sheet grid")
        );
        assert!(
            edit_prompt(GenerationMode::BrandSheet, "make it blue")
                .contains("5-section brand sheet")
        );
        assert!(edit_prompt(GenerationMode::BrandSheet, "make it blue").contains("make it blue"));
    }
}

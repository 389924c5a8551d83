//! Prompt templating for the customer try-on flow.
//!
//! The template carries a single `[Outfit_type]` placeholder which is replaced
//! by the outfit-type token resolved from the catalog.
pub const OUTFIT_PLACEHOLDER: &str = "[Outfit_type]";

pub const TRY_ON_TEMPLATE: &str = "Inputs
Image 1: Fabric swatch (for pattern, texture, color)
Image 2: Person and background (for pose, body, and scene)
Task: Photorealistic Virtual Try-On
Design Outfit: [Outfit_type]

Apply to Image 2:
Replace the person's original clothing (upper and lower) with the new outfit.
Fit the outfit realistically to the person's body and pose, creating natural folds.
Map the Image 1 fabric pattern and texture naturally onto the outfit, respecting seams and scale.
Seamlessly match all lighting, highlights, and shadows from Image 2.

Strict Constraints:
Generate only the described outfit (no new accessories).
Preserve the person's face, pose, and body identically.
Preserve the background of Image 2 identically.";

pub struct PromptConstructor {
    template: String,
}

impl Default for PromptConstructor {
    fn default() -> Self {
        Self::try_on()
    }
}

impl PromptConstructor {
    pub fn try_on() -> Self {
        PromptConstructor { template: TRY_ON_TEMPLATE.to_string() }
    }

    pub fn construct_prompt(&self, outfit_type: &str) -> String {
        self.template.replace(OUTFIT_PLACEHOLDER, outfit_type.trim())
    }
}

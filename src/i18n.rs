//! Labels and prompt templates for the two supported languages.

use serde::{Deserialize, Serialize};

const PROMPT_SLOT: &str = "{prompt}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

pub struct Translations {
    pub language: &'static str,
    pub title: &'static str,
    pub input_prompt: &'static str,
    pub generate_button: &'static str,
    pub download_button: &'static str,
    pub instructions: &'static [&'static str],
    pub image_prompt: &'static str,
}

static EN: Translations = Translations {
    language: "Language",
    title: "🎨 Kids' Coloring Image Generator",
    input_prompt: "Enter a description of the image you want to generate:",
    generate_button: "Generate Image",
    download_button: "Download Image",
    instructions: &[
        "Type a fun description of what you want to see in the image.",
        "Click 'Generate Image' to create a magical coloring page!",
        "Download and print the image for endless coloring fun!",
        "Let your imagination run wild and happy coloring! 🌈✏️",
    ],
    image_prompt: "You are a teacher for young kids (3 years old). In the style of a coloring book for kids, generate a simple, black and white line drawing for kids to color: {prompt}. Never add texts in the image.",
};

static FR: Translations = Translations {
    language: "Langue",
    title: "🎨 Générateur d'Images à Colorier pour Enfants",
    input_prompt: "Entrez une description de l'image que vous souhaitez générer :",
    generate_button: "Générer l'Image",
    download_button: "Télécharger l'Image",
    instructions: &[
        "Tapez une description amusante de ce que vous voulez voir dans l'image.",
        "Cliquez sur 'Générer l'Image' pour créer une page de coloriage magique !",
        "Téléchargez et imprimez l'image pour un plaisir de coloriage sans fin !",
        "Laissez libre cours à votre imagination et bon coloriage ! 🌈✏️",
    ],
    image_prompt: "Vous êtes un enseignant pour jeunes enfants (3 ans). Dans le style d'un livre de coloriage pour enfants, générez un dessin simple en noir et blanc à colorier : {prompt}. N'ajoutez jamais de texte dans l'image.",
};

impl Language {
    pub const ALL: [Language; 2] = [Language::Fr, Language::En];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Selector label, flag included.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Fr => "🇫🇷 Français",
            Language::En => "🇬🇧 English",
        }
    }

    pub fn translations(&self) -> &'static Translations {
        match self {
            Language::Fr => &FR,
            Language::En => &EN,
        }
    }

    pub fn render_prompt(&self, description: &str) -> String {
        self.translations()
            .image_prompt
            .replacen(PROMPT_SLOT, description, 1)
    }
}

use clap::ValueEnum;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use crate::ASSETS;

/// Product categories the guessing prompts are grouped by
#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum Category {
    Fashion,
    Beauty,
    Home,
    Electronics,
    Kitchen,
    Toys,
    Misc,
}

impl Category {
    /// Key of this category's deck in the embedded prompt bank
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

/// A guessing prompt handed to the host to read out
#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    pub category: Category,
}

/// Embedded bank of prompts, one deck per category
#[derive(Debug, Clone)]
pub struct PromptDeck {
    banks: BTreeMap<String, Vec<String>>,
}

impl PromptDeck {
    pub fn builtin() -> Self {
        let file = ASSETS
            .get_file("prompts.json")
            .expect("prompt bank missing from embedded assets");
        let contents = file
            .contents_utf8()
            .expect("prompt bank is not valid utf-8");
        let banks = serde_json::from_str(contents).expect("unable to deserialize prompt bank");
        Self { banks }
    }

    /// Draws a random prompt from the category's deck, falling back to the
    /// misc deck when the category has none.
    pub fn draw(&self, category: Category) -> Prompt {
        let bank = self
            .banks
            .get(&category.key())
            .filter(|bank| !bank.is_empty())
            .or_else(|| self.banks.get(&Category::Misc.key()))
            .expect("prompt bank has no misc deck");
        let text = bank
            .choose(&mut rand::thread_rng())
            .expect("prompt deck is empty")
            .clone();
        Prompt { text, category }
    }

    /// Number of prompts available for a category (before misc fallback)
    pub fn deck_size(&self, category: Category) -> usize {
        self.banks.get(&category.key()).map_or(0, Vec::len)
    }
}

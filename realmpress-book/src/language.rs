//! Chapter titles and UI labels, English and Hungarian.

use realmpress_types::EntityKind;
use serde::{Deserialize, Serialize};

/// Output language for chapter titles and the details-block labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hu,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Hu];

    /// Localized chapter title for one entity kind.
    pub fn chapter_title(&self, kind: EntityKind) -> &'static str {
        use EntityKind::*;
        match self {
            Language::En => match kind {
                Character => "Characters",
                Location => "Locations",
                Organisation => "Organisations",
                Family => "Families",
                Item => "Items",
                Note => "Notes",
                Event => "Events",
                Race => "Races",
                Journal => "Journals",
                Quest => "Quests",
                Tag => "Tags",
                Map => "Maps",
                Calendar => "Calendars",
                Timeline => "Timelines",
                Creature => "Creatures",
            },
            Language::Hu => match kind {
                Character => "Karakterek",
                Location => "Helyszínek",
                Organisation => "Szervezetek",
                Family => "Családok",
                Item => "Tárgyak",
                Note => "Jegyzetek",
                Event => "Események",
                Race => "Fajok",
                Journal => "Naplók",
                Quest => "Küldetések",
                Tag => "Címkék",
                Map => "Térképek",
                Calendar => "Naptárak",
                Timeline => "Idővonalak",
                Creature => "Lények",
            },
        }
    }

    pub fn contents_label(&self) -> &'static str {
        match self {
            Language::En => "Contents",
            Language::Hu => "Tartalomjegyzék",
        }
    }

    pub fn location_label(&self) -> &'static str {
        match self {
            Language::En => "Location",
            Language::Hu => "Helyszín",
        }
    }

    pub fn tags_label(&self) -> &'static str {
        match self {
            Language::En => "Tags",
            Language::Hu => "Címkék",
        }
    }

    pub fn private_label(&self) -> &'static str {
        match self {
            Language::En => "private",
            Language::Hu => "privát",
        }
    }
}

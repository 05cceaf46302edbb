//! Core data model types for phrasedrill.
//!
//! These are the fundamental types that the entire phrasedrill system uses
//! to represent phrases, difficulty tiers, and phrase packs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single practice phrase: a prompt, its expected answer, and the
/// translations of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    /// The phrase shown (or spoken) to the learner.
    pub prompt: String,
    /// The answer the learner is expected to produce.
    pub answer: String,
    /// Translation of the prompt into the learner's language.
    #[serde(default)]
    pub prompt_translation: String,
    /// Translation of the expected answer.
    #[serde(default)]
    pub answer_translation: String,
}

/// Difficulty tiers a phrase pack is organized into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// All tiers, in ascending difficulty order.
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Whether prompt translations are shown before verification.
    ///
    /// Easy drills show the translation up front; harder tiers reveal it
    /// only after the answer is checked.
    pub fn shows_translation_upfront(&self) -> bool {
        matches!(self, Tier::Easy)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// A named collection of phrases grouped by difficulty tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseSet {
    /// Unique identifier for this phrase pack.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this pack.
    #[serde(default)]
    pub description: String,
    /// Ordered phrase lists keyed by tier. Tiers may be empty or absent;
    /// duplicate entries within a tier are allowed.
    #[serde(default)]
    pub tiers: BTreeMap<Tier, Vec<PhraseEntry>>,
}

impl PhraseSet {
    /// The phrases in a tier, empty if the tier is absent.
    pub fn tier(&self, tier: Tier) -> &[PhraseEntry] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of phrases across all tiers.
    pub fn phrase_count(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// The warehouse-dialogue starter pack compiled into the crate.
    pub fn builtin() -> PhraseSet {
        fn entry(
            prompt: &str,
            answer: &str,
            prompt_translation: &str,
            answer_translation: &str,
        ) -> PhraseEntry {
            PhraseEntry {
                prompt: prompt.to_string(),
                answer: answer.to_string(),
                prompt_translation: prompt_translation.to_string(),
                answer_translation: answer_translation.to_string(),
            }
        }

        let easy = vec![
            entry(
                "Hi, how are you?",
                "I'm fine, thanks.",
                "Oi, como você está?",
                "Estou bem, obrigado.",
            ),
            entry(
                "What's your name?",
                "My name is John.",
                "Qual é o seu nome?",
                "Meu nome é John.",
            ),
            entry(
                "Do you like coffee?",
                "Yes, I like coffee.",
                "Você gosta de café?",
                "Sim, eu gosto de café.",
            ),
            entry("Good morning!", "Good morning!", "Bom dia!", "Bom dia!"),
            entry("Thank you!", "You're welcome.", "Obrigado!", "De nada."),
            entry("See you later!", "See you!", "Até mais!", "Até logo."),
            entry("Excuse me", "Yes?", "Com licença", "Sim?"),
            entry(
                "I need help",
                "I can help you.",
                "Preciso de ajuda",
                "Eu posso ajudar.",
            ),
            entry(
                "Where is the restroom?",
                "It is over there.",
                "Onde fica o banheiro?",
                "Fica ali.",
            ),
            entry(
                "I am ready",
                "Great! Let's start.",
                "Estou pronto",
                "Ótimo! Vamos começar.",
            ),
        ];

        let medium = vec![
            entry(
                "Where is the box?",
                "The box is on the table.",
                "Onde está a caixa?",
                "A caixa está na mesa.",
            ),
            entry(
                "Can you help me?",
                "Yes, I can help you.",
                "Você pode me ajudar?",
                "Sim, eu posso te ajudar.",
            ),
            entry(
                "Do you work here?",
                "Yes, I do.",
                "Você trabalha aqui?",
                "Sim, eu trabalho aqui.",
            ),
            entry(
                "I need this item",
                "I will get it for you.",
                "Preciso deste item",
                "Vou pegar para você.",
            ),
            entry(
                "Check the inventory",
                "I will check it now.",
                "Verifique o inventário",
                "Vou verificar agora.",
            ),
            entry(
                "When will it arrive?",
                "Tomorrow morning.",
                "Quando vai chegar?",
                "Amanhã de manhã.",
            ),
            entry(
                "Where can I find the supplies?",
                "They are in aisle 3.",
                "Onde posso encontrar os suprimentos?",
                "No corredor 3.",
            ),
            entry(
                "Please sign here",
                "Okay, I will sign.",
                "Por favor, assine aqui",
                "Ok, vou assinar.",
            ),
            entry(
                "The truck is here",
                "I will unload it.",
                "O caminhão chegou",
                "Vou descarregar.",
            ),
            entry(
                "We need more boxes",
                "I will order them.",
                "Precisamos de mais caixas",
                "Vou pedir.",
            ),
        ];

        let hard = vec![
            entry(
                "Do we have this item in stock?",
                "Yes, we have it.",
                "Temos este item em estoque?",
                "Sim, temos.",
            ),
            entry(
                "Please, sign the paper.",
                "Okay, I will sign.",
                "Por favor, assine o papel",
                "Ok, eu vou assinar.",
            ),
            entry(
                "The truck just arrived.",
                "I will check it.",
                "O caminhão acabou de chegar",
                "Eu vou verificar.",
            ),
            entry(
                "Where can I find the new supplies?",
                "They are in aisle 3.",
                "Onde posso encontrar os novos suprimentos?",
                "Estão no corredor 3.",
            ),
            entry(
                "Check the inventory for today.",
                "I will check it now.",
                "Verifique o inventário de hoje",
                "Vou verificar agora.",
            ),
            entry(
                "Can you organize the shelf?",
                "Yes, I will organize it.",
                "Pode organizar a prateleira",
                "Sim, vou organizar.",
            ),
            entry(
                "We need to prepare the order",
                "I will prepare it.",
                "Precisamos preparar o pedido",
                "Vou preparar.",
            ),
            entry(
                "Is this item damaged?",
                "No, it is fine.",
                "Este item está danificado?",
                "Não, está ok.",
            ),
            entry(
                "Confirm the delivery",
                "I will confirm it.",
                "Confirme a entrega",
                "Vou confirmar.",
            ),
            entry(
                "Update the stock list",
                "I will update it.",
                "Atualize a lista de estoque",
                "Vou atualizar.",
            ),
        ];

        let mut tiers = BTreeMap::new();
        tiers.insert(Tier::Easy, easy);
        tiers.insert(Tier::Medium, medium);
        tiers.insert(Tier::Hard, hard);

        PhraseSet {
            id: "warehouse-english".into(),
            name: "Warehouse English".into(),
            description: "Everyday warehouse dialogues for English practice".into(),
            tiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(Tier::Easy.to_string(), "easy");
        assert_eq!(Tier::Hard.to_string(), "hard");
        assert_eq!("easy".parse::<Tier>().unwrap(), Tier::Easy);
        assert_eq!("Medium".parse::<Tier>().unwrap(), Tier::Medium);
        assert_eq!("HARD".parse::<Tier>().unwrap(), Tier::Hard);
        assert!("expert".parse::<Tier>().is_err());
    }

    #[test]
    fn builtin_pack_has_all_tiers() {
        let set = PhraseSet::builtin();
        for tier in Tier::ALL {
            assert_eq!(set.tier(tier).len(), 10, "tier {tier} should have 10 phrases");
        }
        assert_eq!(set.phrase_count(), 30);
    }

    #[test]
    fn translation_visibility_by_tier() {
        assert!(Tier::Easy.shows_translation_upfront());
        assert!(!Tier::Medium.shows_translation_upfront());
        assert!(!Tier::Hard.shows_translation_upfront());
    }

    #[test]
    fn phrase_set_serde_roundtrip() {
        let set = PhraseSet::builtin();
        let json = serde_json::to_string(&set).unwrap();
        let deserialized: PhraseSet = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, "warehouse-english");
        assert_eq!(deserialized.phrase_count(), 30);
        assert_eq!(deserialized.tier(Tier::Easy)[0].answer, "I'm fine, thanks.");
    }

    #[test]
    fn missing_tier_is_empty() {
        let set = PhraseSet {
            id: "empty".into(),
            name: "Empty".into(),
            description: String::new(),
            tiers: BTreeMap::new(),
        };
        assert!(set.tier(Tier::Easy).is_empty());
        assert_eq!(set.phrase_count(), 0);
    }
}

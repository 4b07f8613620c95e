//! Tissue templates and organ tissue layers.

use serde::{Deserialize, Serialize};

/// A tissue template, shared by every organ layer that references it.
///
/// The four factors scale what happens when the tissue is struck: felt
/// pain per unit of energy, bleeding per unit of energy, how much energy
/// the layer absorbs before letting the rest through, and how much
/// function is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tissue {
    pub id: String,
    pub name: String,
    pub pain: f32,
    pub blood_flow: f32,
    pub resistance: f32,
    pub impairment: f32,
}

/// One layer in an organ's tissue stack, outermost first.
///
/// `hit_prob` weights which layer a blow lands on. The overrides let a
/// generic tissue appear under a local name: the skull is bone, but a
/// wound report should say "skull".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueLayer {
    pub tissue: String,
    pub hit_prob: f32,
    pub name: Option<String>,
    pub custom_id: Option<String>,
}

impl TissueLayer {
    /// Display name, falling back to the tissue template's name.
    pub fn display_name<'a>(&'a self, tissue: &'a Tissue) -> &'a str {
        self.name.as_deref().unwrap_or(&tissue.name)
    }
}

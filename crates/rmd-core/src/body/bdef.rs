//! Body definition ("bdef") loading.
//!
//! Bodies are authored as JSON documents: a list of tissue templates and
//! a nested body part tree whose leaves are organs, each organ naming the
//! sibling it hangs from. [`Body::load`] turns a document into the arena
//! representation, rejecting anything structurally unsound.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::{Body, Organ, Part, PartId, PartKind, Tissue, TissueLayer};

/// Connector value marking an organ as the anchor of its part's graph.
pub const ROOT_CONNECTOR: &str = "_ROOT";

/// Errors raised while loading a body definition.
#[derive(Debug, Error)]
pub enum BdefError {
    #[error("failed to read body definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed body definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("body part '{part}' has neither sub-parts nor organs")]
    EmptyBodyPart { part: String },

    #[error("body part '{part}' mixes sub-parts and organs")]
    MixedBodyPart { part: String },

    #[error("duplicate id '{id}'")]
    DuplicateId { id: String },

    #[error("organ '{organ}' references unknown tissue '{tissue}'")]
    UnknownTissue { organ: String, tissue: String },

    #[error("organ '{organ}' references unknown connector '{connector}'")]
    UnknownConnector { organ: String, connector: String },

    #[error("organ '{organ}' has no tissue layers")]
    NoLayers { organ: String },

    #[error("body part '{part}' has no root organ")]
    NoRootOrgan { part: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BodyDefDoc {
    tissues: Vec<TissueDef>,
    body: PartDef,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TissueDef {
    id: String,
    name: String,
    pain: f32,
    blood_flow: f32,
    resistance: f32,
    impairment: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartDef {
    id: String,
    name: String,
    surface: f32,
    #[serde(default)]
    parts: Vec<PartDef>,
    #[serde(default)]
    organs: Vec<OrganDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OrganDef {
    id: String,
    name: String,
    surface: f32,
    connector: String,
    #[serde(default)]
    vital: bool,
    /// Mirror the layer stack around its innermost layer, so that
    /// `[skin, bone]` reads `[skin, bone, skin]`. Saves typing for
    /// shell-like organs hit from either side.
    #[serde(default)]
    symmetrical: bool,
    tissue_layers: Vec<LayerDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayerDef {
    tissue: String,
    hit_prob: f32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl Body {
    /// Load a body definition from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BdefError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a body definition from JSON text.
    pub fn from_json(text: &str) -> Result<Self, BdefError> {
        let doc: BodyDefDoc = serde_json::from_str(text)?;
        build(doc)
    }

    /// The humanoid body shipped with the engine.
    pub fn default_humanoid() -> Result<Self, BdefError> {
        Self::from_json(include_str!("../../data/humanoid.json"))
    }
}

fn build(doc: BodyDefDoc) -> Result<Body, BdefError> {
    let mut tissues = HashMap::new();
    for def in doc.tissues {
        let tissue = Tissue {
            id: def.id.clone(),
            name: def.name,
            pain: def.pain,
            blood_flow: def.blood_flow,
            resistance: def.resistance,
            impairment: def.impairment,
        };
        if tissues.insert(def.id.clone(), tissue).is_some() {
            return Err(BdefError::DuplicateId { id: def.id });
        }
    }

    let mut builder = Builder {
        parts: Vec::new(),
        iids: HashMap::new(),
        tissues: &tissues,
    };
    let root = builder.add_part(&doc.body, None)?;
    let Builder { parts, iids, .. } = builder;
    Ok(Body {
        parts,
        root,
        tissues,
        iids,
    })
}

struct Builder<'a> {
    parts: Vec<Option<Part>>,
    iids: HashMap<String, PartId>,
    tissues: &'a HashMap<String, Tissue>,
}

impl Builder<'_> {
    fn alloc(&mut self, iid: &str) -> Result<PartId, BdefError> {
        let id = PartId(self.parts.len() as u32);
        if self.iids.insert(iid.to_string(), id).is_some() {
            return Err(BdefError::DuplicateId { id: iid.to_string() });
        }
        self.parts.push(None);
        Ok(id)
    }

    fn add_part(&mut self, def: &PartDef, parent: Option<PartId>) -> Result<PartId, BdefError> {
        match (def.parts.is_empty(), def.organs.is_empty()) {
            (true, true) => {
                return Err(BdefError::EmptyBodyPart {
                    part: def.id.clone(),
                });
            }
            (false, false) => {
                return Err(BdefError::MixedBodyPart {
                    part: def.id.clone(),
                });
            }
            _ => {}
        }
        let id = self.alloc(&def.id)?;
        let mut children = Vec::new();

        if def.organs.is_empty() {
            for sub in &def.parts {
                children.push(self.add_part(sub, Some(id))?);
            }
        } else {
            self.add_organs(def, id, &mut children)?;
        }

        self.parts[id.0 as usize] = Some(Part {
            id,
            iid: def.id.clone(),
            name: def.name.clone(),
            surface: def.surface,
            parent,
            kind: PartKind::BodyPart { children },
        });
        Ok(id)
    }

    fn add_organs(
        &mut self,
        def: &PartDef,
        owner: PartId,
        children: &mut Vec<PartId>,
    ) -> Result<(), BdefError> {
        // Allocate every slot first; connectors may point at later
        // siblings.
        let mut local = HashMap::new();
        for organ in &def.organs {
            let oid = self.alloc(&organ.id)?;
            local.insert(organ.id.as_str(), oid);
            children.push(oid);
        }

        let mut edges = Vec::new();
        let mut has_root = false;
        for (organ, oid) in def.organs.iter().zip(children.iter().copied()) {
            let connector = if organ.connector == ROOT_CONNECTOR {
                has_root = true;
                None
            } else {
                match local.get(organ.connector.as_str()) {
                    Some(c) => {
                        edges.push((*c, oid));
                        Some(*c)
                    }
                    None => {
                        return Err(BdefError::UnknownConnector {
                            organ: organ.id.clone(),
                            connector: organ.connector.clone(),
                        });
                    }
                }
            };
            self.parts[oid.0 as usize] = Some(Part {
                id: oid,
                iid: organ.id.clone(),
                name: organ.name.clone(),
                surface: organ.surface,
                parent: Some(owner),
                kind: PartKind::Organ(Organ {
                    layers: self.layers_for(organ)?,
                    connector,
                    connected: Vec::new(),
                    root: connector.is_none(),
                    vital: organ.vital,
                    stump: false,
                }),
            });
        }
        if !has_root {
            return Err(BdefError::NoRootOrgan {
                part: def.id.clone(),
            });
        }

        for (connector, attached) in edges {
            if let Some(Part {
                kind: PartKind::Organ(organ),
                ..
            }) = self.parts[connector.0 as usize].as_mut()
            {
                organ.connected.push(attached);
            }
        }
        Ok(())
    }

    fn layers_for(&self, organ: &OrganDef) -> Result<Vec<TissueLayer>, BdefError> {
        if organ.tissue_layers.is_empty() {
            return Err(BdefError::NoLayers {
                organ: organ.id.clone(),
            });
        }
        let mut layers = Vec::with_capacity(organ.tissue_layers.len());
        for layer in &organ.tissue_layers {
            if !self.tissues.contains_key(&layer.tissue) {
                return Err(BdefError::UnknownTissue {
                    organ: organ.id.clone(),
                    tissue: layer.tissue.clone(),
                });
            }
            layers.push(TissueLayer {
                tissue: layer.tissue.clone(),
                hit_prob: layer.hit_prob,
                name: layer.name.clone(),
                custom_id: layer.id.clone(),
            });
        }
        if organ.symmetrical {
            for j in (0..layers.len().saturating_sub(1)).rev() {
                layers.push(layers[j].clone());
            }
        }
        Ok(layers)
    }
}

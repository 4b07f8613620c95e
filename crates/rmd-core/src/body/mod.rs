//! Anatomical body model.
//!
//! A body is a tree of body parts whose leaves are organs, each organ a
//! stack of tissue layers. Organs within one body part form a connection
//! graph: every organ either hangs from another organ of the same part or
//! is the root of that part's graph. Severing an organ takes everything
//! attached through it.

pub mod bdef;
pub mod damage;
mod tissue;

pub use bdef::BdefError;
pub use damage::{Destructible, HitReport, Wound};
pub use tissue::{Tissue, TissueLayer};

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::rng::GameRng;

/// Handle to a part within one body.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PartId(pub u32);

/// A node of the body tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    /// Author-facing id from the body definition. Organ connectors
    /// reference these.
    pub iid: String,
    pub name: String,
    /// Relative share of hit-location rolls among siblings.
    pub surface: f32,
    pub parent: Option<PartId>,
    pub kind: PartKind,
}

impl Part {
    pub fn is_organ(&self) -> bool {
        matches!(self.kind, PartKind::Organ(_))
    }

    pub fn organ(&self) -> Option<&Organ> {
        match &self.kind {
            PartKind::Organ(o) => Some(o),
            PartKind::BodyPart { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PartKind {
    /// Interior node; children are body parts or organs.
    BodyPart { children: Vec<PartId> },
    /// Leaf.
    Organ(Organ),
}

/// Organ payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organ {
    /// Tissue stack, outermost first.
    pub layers: Vec<TissueLayer>,
    /// Organ this one hangs from; None for a root organ.
    pub connector: Option<PartId>,
    /// Reverse edges of `connector`.
    pub connected: Vec<PartId>,
    /// Anchor of the enclosing part's organ graph.
    pub root: bool,
    /// Destroying a vital organ kills the owner.
    pub vital: bool,
    /// Set on a surviving connector when something attached to it is
    /// severed.
    pub stump: bool,
}

/// Entry of the flattened outline used by the part browser.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub id: PartId,
    pub depth: usize,
    pub name: String,
    pub is_organ: bool,
    pub stump: bool,
}

/// A complete body: part arena, tree root, tissue templates.
///
/// Parts keep their slot for the life of the body, so part ids stay
/// stable across removals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    parts: Vec<Option<Part>>,
    root: PartId,
    tissues: HashMap<String, Tissue>,
    iids: HashMap<String, PartId>,
}

impl Body {
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    pub fn by_iid(&self, iid: &str) -> Option<&Part> {
        self.iids.get(iid).and_then(|id| self.part(*id))
    }

    pub fn root(&self) -> PartId {
        self.root
    }

    pub fn tissue(&self, id: &str) -> Option<&Tissue> {
        self.tissues.get(id)
    }

    pub fn part_count(&self) -> usize {
        self.parts.iter().flatten().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().flatten()
    }

    pub fn children_of(&self, id: PartId) -> &[PartId] {
        match self.part(id).map(|p| &p.kind) {
            Some(PartKind::BodyPart { children }) => children,
            _ => &[],
        }
    }

    pub fn organ(&self, id: PartId) -> Option<&Organ> {
        self.part(id).and_then(Part::organ)
    }

    /// Whether any organ remains at or below this part.
    pub fn has_organs_below(&self, id: PartId) -> bool {
        match self.part(id).map(|p| &p.kind) {
            Some(PartKind::Organ(_)) => true,
            Some(PartKind::BodyPart { children }) => {
                children.iter().any(|c| self.has_organs_below(*c))
            }
            None => false,
        }
    }

    /// Depth-first flattened view of the tree, in definition order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::new();
        self.outline_rec(self.root, 0, &mut out);
        out
    }

    fn outline_rec(&self, id: PartId, depth: usize, out: &mut Vec<OutlineEntry>) {
        let Some(part) = self.part(id) else { return };
        let (is_organ, stump) = match &part.kind {
            PartKind::Organ(o) => (true, o.stump),
            PartKind::BodyPart { .. } => (false, false),
        };
        out.push(OutlineEntry {
            id,
            depth,
            name: part.name.clone(),
            is_organ,
            stump,
        });
        for child in self.children_of(id) {
            self.outline_rec(*child, depth + 1, out);
        }
    }

    /// Remove a part. An organ takes everything connected through it and
    /// leaves a stump on its surviving connector; a body part takes its
    /// whole subtree. Body parts left with no organs beneath are culled.
    /// Returns the names of everything removed. The tree root cannot be
    /// removed.
    pub fn remove_part(&mut self, id: PartId) -> Vec<String> {
        let mut removed = Vec::new();
        if id == self.root {
            return removed;
        }
        self.remove_rec(id, &mut removed);
        self.cull_empty_parts(&mut removed);
        removed
    }

    fn remove_rec(&mut self, id: PartId, removed: &mut Vec<String>) {
        let Some(part) = self.parts.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        self.iids.remove(&part.iid);

        match &part.kind {
            PartKind::BodyPart { children } => {
                for child in children.clone() {
                    self.remove_rec(child, removed);
                }
            }
            PartKind::Organ(organ) => {
                for attached in organ.connected.clone() {
                    self.remove_rec(attached, removed);
                }
                if let Some(conn) = organ.connector {
                    if let Some(PartKind::Organ(c)) = self.part_mut(conn).map(|p| &mut p.kind) {
                        c.connected.retain(|a| *a != id);
                        c.stump = true;
                    }
                }
            }
        }

        if let Some(parent) = part.parent {
            if let Some(PartKind::BodyPart { children }) =
                self.part_mut(parent).map(|p| &mut p.kind)
            {
                children.retain(|c| *c != id);
            }
        }

        removed.push(part.name);
    }

    /// Drop body parts with no organ anywhere beneath them. The tree root
    /// survives even when emptied.
    fn cull_empty_parts(&mut self, removed: &mut Vec<String>) {
        loop {
            let empty: Vec<PartId> = self
                .iter()
                .filter(|p| !p.is_organ() && p.id != self.root && !self.has_organs_below(p.id))
                .map(|p| p.id)
                .collect();
            if empty.is_empty() {
                break;
            }
            for id in empty {
                self.remove_rec(id, removed);
            }
        }
    }

    /// Debug helper: tear off a uniformly random part. Never picks the
    /// tree root.
    pub fn remove_random_part(&mut self, rng: &mut GameRng) -> Vec<String> {
        let candidates: Vec<PartId> = self
            .iter()
            .map(|p| p.id)
            .filter(|id| *id != self.root)
            .collect();
        match rng.choose(&candidates).copied() {
            Some(id) => self.remove_part(id),
            None => Vec::new(),
        }
    }

    /// Graphviz rendering: one cluster per body part, organ connector
    /// edges between organ nodes. Root organs are drawn as boxes.
    pub fn dot_graph(&self) -> String {
        let mut out = String::from("digraph body {\n");
        let mut cluster = 0usize;
        self.dot_rec(self.root, &mut out, &mut cluster);
        for part in self.iter() {
            if let PartKind::Organ(organ) = &part.kind {
                if let Some(connector) = organ.connector.and_then(|c| self.part(c)) {
                    let _ = writeln!(out, "    \"{}\" -> \"{}\";", connector.iid, part.iid);
                }
            }
        }
        out.push_str("}\n");
        out
    }

    fn dot_rec(&self, id: PartId, out: &mut String, cluster: &mut usize) {
        let Some(part) = self.part(id) else { return };
        let PartKind::BodyPart { children } = &part.kind else {
            return;
        };
        let _ = writeln!(out, "    subgraph cluster_{} {{", cluster);
        *cluster += 1;
        let _ = writeln!(out, "    label = \"{}\";", part.name);
        for child in children {
            if let Some(c) = self.part(*child) {
                if let PartKind::Organ(o) = &c.kind {
                    let shape = if o.root { ", shape=box" } else { "" };
                    let _ = writeln!(out, "    \"{}\" [label=\"{}\"{}];", c.iid, c.name, shape);
                }
            }
        }
        for child in children {
            if self.part(*child).is_some_and(|c| !c.is_organ()) {
                self.dot_rec(*child, out, cluster);
            }
        }
        out.push_str("    }\n");
    }
}

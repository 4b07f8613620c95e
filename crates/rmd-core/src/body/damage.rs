//! Hit resolution against an anatomical body.

use serde::{Deserialize, Serialize};

use super::{Body, PartId, PartKind};
use crate::consts::BLEED_DIVISOR;
use crate::rng::GameRng;

/// Wound factors are calibrated per this much arriving energy.
const ENERGY_UNIT: f32 = 10.0;

/// Wound factors for a surviving connector when something attached to it
/// is torn off, per [`ENERGY_UNIT`] of blow energy.
const STUMP_PAIN: f32 = 4.0;
const STUMP_BLOOD_FLOW: f32 = 6.0;
const STUMP_IMPAIRMENT: f32 = 2.0;

/// An open wound on one tissue layer of one part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wound {
    pub part: PartId,
    pub part_name: String,
    pub layer_name: String,
    pub pain: f32,
    pub blood_loss: f32,
    pub impairment: f32,
}

/// What a resolved hit did, for message logs.
#[derive(Debug, Clone)]
pub struct HitReport {
    /// Name of the organ the blow landed on.
    pub organ: String,
    /// Name of the struck tissue layer.
    pub layer: String,
    /// Names of everything severed, empty when the organ held.
    pub severed: Vec<String>,
    /// A vital organ was destroyed.
    pub fatal: bool,
}

/// Health state of an actor: an hp pool, optionally backed by a full
/// anatomical model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destructible {
    pub max_hp: i32,
    pub hp: i32,
    pub body: Option<Body>,
    wounds: Vec<Wound>,
}

impl Destructible {
    pub fn new(max_hp: i32) -> Self {
        Self {
            max_hp,
            hp: max_hp,
            body: None,
            wounds: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Plain hp loss, saturating at zero.
    pub fn damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn wounds(&self) -> &[Wound] {
        &self.wounds
    }

    /// Resolve a blow against the body.
    ///
    /// Rolls the hit location down the part tree by surface weights, rolls
    /// the struck tissue layer by hit probability, then spends the energy
    /// inward from that layer. Every layer reached takes a wound scaled by
    /// the energy arriving at it and absorbs up to its resistance. Energy
    /// left after the innermost layer destroys the organ: everything
    /// hanging off it is severed, the surviving connector takes a stump
    /// wound, and a vital organ takes the owner with it.
    ///
    /// Returns None when there was no anatomical hit to resolve; the hp
    /// pool still drops by the blow's energy either way.
    pub fn apply_hit(&mut self, energy: f32, rng: &mut GameRng) -> Option<HitReport> {
        if energy <= 0.0 {
            return None;
        }
        self.hp = (self.hp - energy.round() as i32).max(0);

        let body = self.body.as_mut()?;

        let mut current = body.root();
        let organ_id = loop {
            match &body.part(current)?.kind {
                PartKind::Organ(_) => break current,
                PartKind::BodyPart { children } => {
                    let weights: Vec<f32> = children
                        .iter()
                        .map(|c| body.part(*c).map_or(0.0, |p| p.surface))
                        .collect();
                    let picked = rng.pick_weighted(&weights)?;
                    current = children[picked];
                }
            }
        };

        let organ_part = body.part(organ_id)?;
        let organ = organ_part.organ()?;
        let organ_name = organ_part.name.clone();
        let vital = organ.vital;
        let connector = organ.connector;

        let layer_weights: Vec<f32> = organ.layers.iter().map(|l| l.hit_prob).collect();
        let struck = rng.pick_weighted(&layer_weights)?;
        let layers = organ.layers[struck..].to_vec();

        let mut remaining = energy;
        let mut struck_layer = String::new();
        let mut penetrated = false;
        for (i, layer) in layers.iter().enumerate() {
            let Some(tissue) = body.tissue(&layer.tissue) else {
                continue;
            };
            let scale = remaining / ENERGY_UNIT;
            let layer_name = layer.display_name(tissue).to_string();
            if i == 0 {
                struck_layer = layer_name.clone();
            }
            self.wounds.push(Wound {
                part: organ_id,
                part_name: organ_name.clone(),
                layer_name,
                pain: tissue.pain * scale,
                blood_loss: tissue.blood_flow * scale,
                impairment: tissue.impairment * scale,
            });
            remaining -= tissue.resistance;
            if remaining <= 0.0 {
                break;
            }
            if i == layers.len() - 1 {
                penetrated = true;
            }
        }

        let mut severed = Vec::new();
        let mut fatal = false;
        if penetrated {
            severed = body.remove_part(organ_id);
            self.wounds.retain(|w| body.part(w.part).is_some());
            if let Some(conn_part) = connector.and_then(|c| body.part(c)) {
                let scale = energy / ENERGY_UNIT;
                self.wounds.push(Wound {
                    part: conn_part.id,
                    part_name: conn_part.name.clone(),
                    layer_name: "stump".to_string(),
                    pain: STUMP_PAIN * scale,
                    blood_loss: STUMP_BLOOD_FLOW * scale,
                    impairment: STUMP_IMPAIRMENT * scale,
                });
            }
            if vital {
                fatal = true;
                self.hp = 0;
            }
        }

        Some(HitReport {
            organ: organ_name,
            layer: struck_layer,
            severed,
            fatal,
        })
    }

    /// Tear off a uniformly random part, dropping the wounds that went
    /// with it.
    pub fn remove_random_part(&mut self, rng: &mut GameRng) -> Vec<String> {
        let Some(body) = self.body.as_mut() else {
            return Vec::new();
        };
        let removed = body.remove_random_part(rng);
        self.wounds.retain(|w| body.part(w.part).is_some());
        removed
    }

    pub fn total_pain(&self) -> f32 {
        self.wounds.iter().map(|w| w.pain).sum()
    }

    pub fn total_blood_loss(&self) -> f32 {
        self.wounds.iter().map(|w| w.blood_loss).sum()
    }

    pub fn total_impairment(&self) -> f32 {
        self.wounds.iter().map(|w| w.impairment).sum()
    }

    /// Drain hp from open wounds. Called once per turn.
    pub fn bleed_tick(&mut self) {
        let loss = (self.total_blood_loss() / BLEED_DIVISOR) as i32;
        if loss > 0 {
            self.damage(loss);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One anchor organ with zero surface (so hits never land on it) and
    // one exposed sac the blow always reaches.
    fn sac_body(sac_vital: bool) -> Body {
        let vital = if sac_vital { "true" } else { "false" };
        Body::from_json(&format!(
            r#"{{
            "tissues": [
                {{"id": "skin", "name": "skin", "pain": 2.0, "blood_flow": 4.0,
                  "resistance": 1.0, "impairment": 0.5}},
                {{"id": "bone", "name": "bone", "pain": 5.0, "blood_flow": 0.5,
                  "resistance": 8.0, "impairment": 5.0}}
            ],
            "body": {{
                "id": "b", "name": "B", "surface": 100.0,
                "organs": [
                    {{"id": "anchor", "name": "Anchor", "surface": 0.0,
                      "connector": "_ROOT",
                      "tissue_layers": [{{"tissue": "bone", "hit_prob": 1.0}}]}},
                    {{"id": "sac", "name": "Sac", "surface": 100.0,
                      "connector": "anchor", "vital": {vital},
                      "tissue_layers": [{{"tissue": "skin", "hit_prob": 1.0}}]}}
                ]
            }}
        }}"#,
        ))
        .unwrap()
    }

    // As above but the sac resists more than any test blow carries.
    fn tough_body() -> Body {
        Body::from_json(
            r#"{
            "tissues": [
                {"id": "plate", "name": "plate", "pain": 1.0, "blood_flow": 1.0,
                 "resistance": 1000.0, "impairment": 1.0}
            ],
            "body": {
                "id": "b", "name": "B", "surface": 100.0,
                "organs": [
                    {"id": "anchor", "name": "Anchor", "surface": 0.0,
                     "connector": "_ROOT",
                     "tissue_layers": [{"tissue": "plate", "hit_prob": 1.0}]},
                    {"id": "sac", "name": "Sac", "surface": 100.0,
                     "connector": "anchor",
                     "tissue_layers": [{"tissue": "plate", "hit_prob": 1.0}]}
                ]
            }
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut d = Destructible::new(10);
        d.damage(3);
        assert_eq!(d.hp, 7);
        d.damage(100);
        assert_eq!(d.hp, 0);
        assert!(d.is_dead());
        d.heal(100);
        assert_eq!(d.hp, 10);
        d.damage(-5);
        assert_eq!(d.hp, 10);
    }

    #[test]
    fn test_zero_energy_hit_does_nothing() {
        let mut d = Destructible::new(10).with_body(sac_body(false));
        let mut rng = GameRng::new(1);
        assert!(d.apply_hit(0.0, &mut rng).is_none());
        assert_eq!(d.hp, 10);
        assert!(d.wounds().is_empty());
    }

    #[test]
    fn test_hit_without_body_is_plain_damage() {
        let mut d = Destructible::new(10);
        let mut rng = GameRng::new(1);
        assert!(d.apply_hit(4.0, &mut rng).is_none());
        assert_eq!(d.hp, 6);
        assert!(d.wounds().is_empty());
    }

    #[test]
    fn test_absorbed_hit_wounds_without_severing() {
        let mut d = Destructible::new(100).with_body(tough_body());
        let mut rng = GameRng::new(7);
        let report = d.apply_hit(12.0, &mut rng).unwrap();
        assert_eq!(report.organ, "Sac");
        assert_eq!(report.layer, "plate");
        assert!(report.severed.is_empty());
        assert!(!report.fatal);
        assert_eq!(d.hp, 88);
        assert_eq!(d.wounds().len(), 1);
        let w = &d.wounds()[0];
        assert_eq!(w.part_name, "Sac");
        // 12 energy on factor-1 tissue.
        assert!((w.pain - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_penetration_severs_and_leaves_stump_wound() {
        let mut d = Destructible::new(100).with_body(sac_body(false));
        let mut rng = GameRng::new(7);
        let report = d.apply_hit(20.0, &mut rng).unwrap();
        assert_eq!(report.severed, vec!["Sac".to_string()]);
        assert!(!report.fatal);

        let body = d.body.as_ref().unwrap();
        assert!(body.by_iid("sac").is_none());
        assert!(body.by_iid("anchor").unwrap().organ().unwrap().stump);

        // The sac's own wound went with it; only the stump wound remains.
        assert_eq!(d.wounds().len(), 1);
        assert_eq!(d.wounds()[0].layer_name, "stump");
        assert!(d.wounds()[0].blood_loss > 0.0);
    }

    #[test]
    fn test_vital_destruction_is_fatal() {
        let mut d = Destructible::new(100).with_body(sac_body(true));
        let mut rng = GameRng::new(7);
        let report = d.apply_hit(20.0, &mut rng).unwrap();
        assert!(report.fatal);
        assert_eq!(d.hp, 0);
        assert!(d.is_dead());
    }

    #[test]
    fn test_wounds_accumulate_into_totals() {
        let mut d = Destructible::new(1000).with_body(tough_body());
        let mut rng = GameRng::new(3);
        d.apply_hit(10.0, &mut rng).unwrap();
        d.apply_hit(10.0, &mut rng).unwrap();
        assert_eq!(d.wounds().len(), 2);
        assert!((d.total_pain() - 2.0).abs() < 1e-5);
        assert!((d.total_blood_loss() - 2.0).abs() < 1e-5);
        assert!((d.total_impairment() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bleed_tick_drains_hp() {
        let mut d = Destructible::new(50);
        d.wounds.push(Wound {
            part: PartId(0),
            part_name: "Torso".to_string(),
            layer_name: "artery".to_string(),
            pain: 0.0,
            blood_loss: 25.0,
            impairment: 0.0,
        });
        d.bleed_tick();
        assert_eq!(d.hp, 48);
        // A trickle below one hp per turn is free.
        d.wounds[0].blood_loss = 5.0;
        d.bleed_tick();
        assert_eq!(d.hp, 48);
    }
}

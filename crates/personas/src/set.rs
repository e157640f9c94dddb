//! The closed persona registry.
//!
//! One instance per orchestrator; lookup is by `PersonaId` only, so an
//! unvalidated string can never select a persona. Iteration order is the
//! declaration order of [`PersonaId::ALL`].

use std::sync::Arc;

use dormline_core::generator::Generator;
use dormline_core::persona::{Persona, PersonaId};

use crate::{ConfidantPersona, MirrorPersona, RoasterPersona};

/// Every persona, constructed over one shared generator.
pub struct PersonaSet {
    confidant: ConfidantPersona,
    mirror: MirrorPersona,
    roaster: RoasterPersona,
}

impl PersonaSet {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            confidant: ConfidantPersona::new(generator.clone()),
            mirror: MirrorPersona::new(generator.clone()),
            roaster: RoasterPersona::new(generator),
        }
    }

    /// Look up a persona. Total over the closed set — no failure path.
    pub fn get(&self, id: PersonaId) -> &dyn Persona {
        match id {
            PersonaId::Confidant => &self.confidant,
            PersonaId::Mirror => &self.mirror,
            PersonaId::Roaster => &self.roaster,
        }
    }

    /// All personas in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Persona> {
        PersonaId::ALL.into_iter().map(|id| self.get(id))
    }
}

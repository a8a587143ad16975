use serde::{Deserialize, Serialize};

use crate::core::types::Component;

/// Condition scores for the eight assessed components, each in `[0, 100]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentScores {
    pub engine: u8,
    pub transmission: u8,
    pub brakes: u8,
    pub suspension: u8,
    pub tires: u8,
    pub electrical: u8,
    pub body: u8,
    pub frame: u8,
}

impl ComponentScores {
    pub fn get(&self, component: Component) -> u8 {
        match component {
            Component::Engine => self.engine,
            Component::Transmission => self.transmission,
            Component::Brakes => self.brakes,
            Component::Suspension => self.suspension,
            Component::Tires => self.tires,
            Component::Electrical => self.electrical,
            Component::Body => self.body,
            Component::Frame => self.frame,
        }
    }

    /// Set a component score, clamped to the `[0, 100]` domain.
    pub fn set(&mut self, component: Component, value: u8) {
        let value = value.min(100);
        match component {
            Component::Engine => self.engine = value,
            Component::Transmission => self.transmission = value,
            Component::Brakes => self.brakes = value,
            Component::Suspension => self.suspension = value,
            Component::Tires => self.tires = value,
            Component::Electrical => self.electrical = value,
            Component::Body => self.body = value,
            Component::Frame => self.frame = value,
        }
    }
}

impl Default for ComponentScores {
    fn default() -> Self {
        Self {
            engine: 50,
            transmission: 50,
            brakes: 50,
            suspension: 50,
            tires: 50,
            electrical: 50,
            body: 50,
            frame: 50,
        }
    }
}

/// The in-progress inspection a user is filling out.
///
/// Optional text fields use the empty string for "not provided"; they are
/// converted to absent values when a record is built for persistence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DraftInspection {
    pub name: String,
    pub year: Option<i32>,
    pub make: String,
    pub model: String,
    pub mileage: Option<u32>,
    pub asking_price: Option<f64>,
    pub location: String,
    pub scores: ComponentScores,
    pub notes: String,
}

pub fn default_draft() -> DraftInspection {
    DraftInspection::default()
}

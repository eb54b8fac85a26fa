use std::sync::Arc;

use serde::Deserialize;

/// Boolean household attributes that synthesis can switch on.
///
/// Replaces lookup of attributes by string name: each tag resolves to one
/// field of [`HouseholdAgent`] at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdFlag {
    WashingMachine,
    WasherDryer,
    TumbleDryer,
    DishWasher,
    ElectricalWaterHeat,
    ElectricalSpaceHeat,
}

impl HouseholdFlag {
    /// All flags in declaration order.
    pub const ALL: [HouseholdFlag; 6] = [
        HouseholdFlag::WashingMachine,
        HouseholdFlag::WasherDryer,
        HouseholdFlag::TumbleDryer,
        HouseholdFlag::DishWasher,
        HouseholdFlag::ElectricalWaterHeat,
        HouseholdFlag::ElectricalSpaceHeat,
    ];

    /// External attribute name, as used in input files and reports.
    pub fn name(self) -> &'static str {
        match self {
            HouseholdFlag::WashingMachine => "hasWashingMachine",
            HouseholdFlag::WasherDryer => "hasWasherDryer",
            HouseholdFlag::TumbleDryer => "hasTumbleDryer",
            HouseholdFlag::DishWasher => "hasDishWasher",
            HouseholdFlag::ElectricalWaterHeat => "hasElectricalWaterHeat",
            HouseholdFlag::ElectricalSpaceHeat => "hasElectricalSpaceHeat",
        }
    }
}

/// Integer household attributes drawn from discrete distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseholdCount {
    NumOccupants,
}

impl HouseholdCount {
    pub fn name(self) -> &'static str {
        match self {
            HouseholdCount::NumOccupants => "numOccupants",
        }
    }
}

/// A household prosumer as seen by population synthesis.
///
/// Only the attributes synthesis assigns are modeled. Flags start `false`
/// and can only be switched on; occupancy is unset until drawn.
#[derive(Debug, Clone)]
pub struct HouseholdAgent {
    num_occupants: Option<u8>,
    has_washing_machine: bool,
    has_washer_dryer: bool,
    has_tumble_dryer: bool,
    has_dish_washer: bool,
    has_electrical_water_heat: bool,
    has_electrical_space_heat: bool,
    /// DEFRA category assigned by the population factory.
    pub defra_category: u8,
    /// Shared baseline demand profile selected for this build.
    pub base_demand: Arc<[f32]>,
    /// Demand profile of this household's DEFRA category, when supplied.
    pub category_profile: Option<Arc<[f32]>>,
}

impl HouseholdAgent {
    /// Creates a household with no occupancy and no appliances.
    pub fn new(defra_category: u8, base_demand: Arc<[f32]>) -> Self {
        Self {
            num_occupants: None,
            has_washing_machine: false,
            has_washer_dryer: false,
            has_tumble_dryer: false,
            has_dish_washer: false,
            has_electrical_water_heat: false,
            has_electrical_space_heat: false,
            defra_category,
            base_demand,
            category_profile: None,
        }
    }

    /// Attaches the category demand profile.
    pub fn with_category_profile(mut self, profile: Arc<[f32]>) -> Self {
        self.category_profile = Some(profile);
        self
    }

    pub fn num_occupants(&self) -> Option<u8> {
        self.num_occupants
    }

    /// Sets an integer attribute. Occupancy is set once; later writes are ignored.
    ///
    /// Returns `true` if the value was written.
    pub fn set_count(&mut self, attribute: HouseholdCount, value: u8) -> bool {
        let slot = match attribute {
            HouseholdCount::NumOccupants => &mut self.num_occupants,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Returns the current value of a flag.
    pub fn flag(&self, flag: HouseholdFlag) -> bool {
        match flag {
            HouseholdFlag::WashingMachine => self.has_washing_machine,
            HouseholdFlag::WasherDryer => self.has_washer_dryer,
            HouseholdFlag::TumbleDryer => self.has_tumble_dryer,
            HouseholdFlag::DishWasher => self.has_dish_washer,
            HouseholdFlag::ElectricalWaterHeat => self.has_electrical_water_heat,
            HouseholdFlag::ElectricalSpaceHeat => self.has_electrical_space_heat,
        }
    }

    /// Switches a flag on. Flags are never switched off.
    ///
    /// Returns `true` if the flag changed.
    pub fn set_flag(&mut self, flag: HouseholdFlag) -> bool {
        let slot = match flag {
            HouseholdFlag::WashingMachine => &mut self.has_washing_machine,
            HouseholdFlag::WasherDryer => &mut self.has_washer_dryer,
            HouseholdFlag::TumbleDryer => &mut self.has_tumble_dryer,
            HouseholdFlag::DishWasher => &mut self.has_dish_washer,
            HouseholdFlag::ElectricalWaterHeat => &mut self.has_electrical_water_heat,
            HouseholdFlag::ElectricalSpaceHeat => &mut self.has_electrical_space_heat,
        };
        let changed = !*slot;
        *slot = true;
        changed
    }

    pub fn has_washing_machine(&self) -> bool {
        self.has_washing_machine
    }

    pub fn has_washer_dryer(&self) -> bool {
        self.has_washer_dryer
    }

    pub fn has_tumble_dryer(&self) -> bool {
        self.has_tumble_dryer
    }

    pub fn has_dish_washer(&self) -> bool {
        self.has_dish_washer
    }

    pub fn has_electrical_water_heat(&self) -> bool {
        self.has_electrical_water_heat
    }

    pub fn has_electrical_space_heat(&self) -> bool {
        self.has_electrical_space_heat
    }
}

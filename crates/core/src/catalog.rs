//! Component catalog enumerations and inventory quantity rules.
//!
//! The quantity helpers are the pure half of the inventory ledger: they decide
//! what a create or update is allowed to write, while the conditional
//! decrement at fulfillment time lives in the db crate (it must be a single
//! predicated UPDATE inside a transaction).

use std::fmt;
use std::str::FromStr;

/// Component category shelf labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Microcontroller,
    Sensor,
    Actuator,
    Display,
    Power,
    Cable,
    Tool,
    Misc,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Microcontroller,
        Category::Sensor,
        Category::Actuator,
        Category::Display,
        Category::Power,
        Category::Cable,
        Category::Tool,
        Category::Misc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Microcontroller => "MICROCONTROLLER",
            Category::Sensor => "SENSOR",
            Category::Actuator => "ACTUATOR",
            Category::Display => "DISPLAY",
            Category::Power => "POWER",
            Category::Cable => "CABLE",
            Category::Tool => "TOOL",
            Category::Misc => "MISC",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category '{s}'"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical storage location of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Lab,
    Storeroom,
    CabinetA,
    CabinetB,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Lab,
        Location::Storeroom,
        Location::CabinetA,
        Location::CabinetB,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Lab => "LAB",
            Location::Storeroom => "STOREROOM",
            Location::CabinetA => "CABINET_A",
            Location::CabinetB => "CABINET_B",
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("Unknown location '{s}'"))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the quantities a newly-created component starts with.
///
/// `available` defaults to `total` when unspecified. An explicit `available`
/// may be lower than `total` (a component can start partially available) but
/// never higher, and neither value may be negative.
pub fn initial_quantities(total: i32, available: Option<i32>) -> Result<(i32, i32), String> {
    let available = available.unwrap_or(total);
    check_quantities(total, available)?;
    Ok((total, available))
}

/// Resolve the quantities a component update is allowed to write.
///
/// Changing `total` without specifying `available` re-bases `available` to
/// the new total. An explicit `available` must not exceed the effective
/// total, whether or not the total changed in the same update.
pub fn resolve_quantity_update(
    current_total: i32,
    current_available: i32,
    new_total: Option<i32>,
    new_available: Option<i32>,
) -> Result<(i32, i32), String> {
    let total = new_total.unwrap_or(current_total);
    let available = match (new_total, new_available) {
        (_, Some(a)) => a,
        (Some(t), None) => t,
        (None, None) => current_available,
    };
    check_quantities(total, available)?;
    Ok((total, available))
}

fn check_quantities(total: i32, available: i32) -> Result<(), String> {
    if total < 0 {
        return Err("totalQuantity must not be negative".to_string());
    }
    if available < 0 {
        return Err("availableQuantity must not be negative".to_string());
    }
    if available > total {
        return Err(format!(
            "availableQuantity ({available}) must not exceed totalQuantity ({total})"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("RESISTOR".parse::<Category>().is_err());
    }

    #[test]
    fn test_location_round_trip() {
        for location in Location::ALL {
            assert_eq!(location.as_str().parse::<Location>().unwrap(), location);
        }
        assert!("lab".parse::<Location>().is_err());
    }

    #[test]
    fn test_initial_quantities_default_to_total() {
        assert_eq!(initial_quantities(10, None).unwrap(), (10, 10));
    }

    #[test]
    fn test_initial_quantities_explicit_partial() {
        // A component may start partially available.
        assert_eq!(initial_quantities(10, Some(4)).unwrap(), (10, 4));
        assert_eq!(initial_quantities(10, Some(0)).unwrap(), (10, 0));
    }

    #[test]
    fn test_initial_quantities_rejects_overdraw() {
        assert!(initial_quantities(5, Some(6)).is_err());
        assert!(initial_quantities(-1, None).is_err());
        assert!(initial_quantities(5, Some(-2)).is_err());
    }

    #[test]
    fn test_update_rebases_available_on_total_change() {
        // total changes, available unspecified: available follows the new total.
        assert_eq!(resolve_quantity_update(10, 7, Some(20), None).unwrap(), (20, 20));
        assert_eq!(resolve_quantity_update(10, 7, Some(3), None).unwrap(), (3, 3));
    }

    #[test]
    fn test_update_explicit_available_checked_against_new_total() {
        assert_eq!(resolve_quantity_update(10, 7, Some(20), Some(15)).unwrap(), (20, 15));
        assert!(resolve_quantity_update(10, 7, Some(20), Some(21)).is_err());
    }

    #[test]
    fn test_update_available_only() {
        assert_eq!(resolve_quantity_update(10, 7, None, Some(9)).unwrap(), (10, 9));
        assert!(resolve_quantity_update(10, 7, None, Some(11)).is_err());
    }

    #[test]
    fn test_update_no_quantity_fields_keeps_current() {
        assert_eq!(resolve_quantity_update(10, 7, None, None).unwrap(), (10, 7));
    }

    #[test]
    fn test_update_rejects_negatives() {
        assert!(resolve_quantity_update(10, 7, Some(-1), None).is_err());
        assert!(resolve_quantity_update(10, 7, None, Some(-1)).is_err());
    }
}

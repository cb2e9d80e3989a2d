//! Fixed table of weapon categories.
//!
//! Each category maps one spreadsheet tab (addressed by its `gid`) to a
//! display name. The table is process-wide and immutable; every lookup and
//! every cache rebuild iterates it in this order.

/// All weapon categories, in canonical iteration order.
pub const CATEGORIES: &[(i64, &str)] = &[
    (1595979957, "Shotguns"),
    (1090554564, "Sniper Rifles"),
    (1318165198, "Fusion Rifles"),
    (657764751, "Energy Grenade Launchers"),
    (1239299765, "Glaives"),
    (288998351, "Trace Rifles"),
    (550485113, "Rocket Sidearms"),
    (1919916707, "Light Machine Guns"),
    (439751986, "Heavy Grenade Launchers"),
    (473850359, "Swords"),
    (981030684, "Rocket Launchers"),
    (29008106, "Linear Fusion Rifles"),
    (1890042119, "Auto Rifles"),
    (324500912, "Bows"),
    (1315046624, "Hand Cannons"),
    (1712537582, "Pulse Rifles"),
    (946843299, "Scout Rifles"),
    (1594008157, "Sidearms"),
    (1405969509, "Submachine Guns"),
];

/// Display name for a tab id, if it is a known category.
pub fn name_for(gid: i64) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|&&(id, _)| id == gid)
        .map(|&(_, name)| name)
}

/// Whether `name` is a known category display name.
pub fn is_known_name(name: &str) -> bool {
    CATEGORIES.iter().any(|&(_, n)| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_for_known_gid() {
        assert_eq!(name_for(324500912), Some("Bows"));
        assert_eq!(name_for(473850359), Some("Swords"));
    }

    #[test]
    fn test_name_for_unknown_gid() {
        assert_eq!(name_for(42), None);
    }

    #[test]
    fn test_table_has_no_duplicate_names() {
        let mut names: Vec<&str> = CATEGORIES.iter().map(|&(_, n)| n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATEGORIES.len());
    }
}

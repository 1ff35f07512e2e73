/// Area assigned to addresses we cannot place. Never matches a rota area.
pub const UNKNOWN_AREA: &str = "Unknown";

// Locality matches are checked first and in order: more specific towns
// before the ones whose names contain them ("ards" last, or Newtownards
// customers would classify as Ards).
const LOCALITY_AREAS: &[(&str, &str)] = &[
    ("groomsport", "Groomsport"),
    ("conlig", "Conlig"),
    ("millisle", "Millisle"),
    ("ballywalter", "Ballywalter"),
    ("carrowdore", "Carrowdore"),
    ("greyabbey", "Greyabbey"),
    ("donaghadee", "Donaghadee"),
    ("newtownards", "Newtownards"),
    ("comber", "Comber"),
    ("dundonald", "Dundonald"),
    ("holywood", "Holywood"),
    ("cultra", "Cultra"),
    ("bangor", "Bangor"),
    ("ards", "Ards"),
];

const POSTCODE_AREAS: &[(&str, &str)] = &[
    ("BT16", "Dundonald"),
    ("BT18", "Holywood"),
    ("BT19", "Bangor"),
    ("BT20", "Bangor"),
    ("BT21", "Donaghadee"),
    ("BT22", "Ards Peninsula"),
    ("BT23", "Newtownards"),
];

/// Best-effort service area for a customer address: locality text first
/// (more specific), postcode district second, `UNKNOWN_AREA` otherwise.
pub fn area_for_address(postcode: &str, locality: &str) -> &'static str {
    let locality = locality.to_lowercase();
    for (needle, area) in LOCALITY_AREAS {
        if locality.contains(needle) {
            return area;
        }
    }

    let postcode = postcode.trim().to_uppercase();
    for (prefix, area) in POSTCODE_AREAS {
        if postcode.starts_with(prefix) {
            return area;
        }
    }

    UNKNOWN_AREA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality_substring_match() {
        assert_eq!(area_for_address("", "Groomsport, County Down"), "Groomsport");
        assert_eq!(area_for_address("", "BANGOR"), "Bangor");
    }

    #[test]
    fn test_locality_specificity_order() {
        // Newtownards must not classify as Ards.
        assert_eq!(area_for_address("", "Newtownards"), "Newtownards");
        assert_eq!(area_for_address("", "Ards"), "Ards");
    }

    #[test]
    fn test_locality_wins_over_postcode() {
        // BT19 alone is Bangor, but the named village is more specific.
        assert_eq!(area_for_address("BT19 6XY", "Groomsport"), "Groomsport");
    }

    #[test]
    fn test_postcode_prefix_match() {
        assert_eq!(area_for_address("BT20 5EY", ""), "Bangor");
        assert_eq!(area_for_address("bt23 4ab", ""), "Newtownards");
        assert_eq!(area_for_address("  BT21 0AA ", ""), "Donaghadee");
    }

    #[test]
    fn test_unresolved_maps_to_unknown() {
        assert_eq!(area_for_address("BT1 1AA", "Belfast"), UNKNOWN_AREA);
        assert_eq!(area_for_address("", ""), UNKNOWN_AREA);
    }
}

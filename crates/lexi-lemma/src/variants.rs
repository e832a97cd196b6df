//! American/British spelling pairs. Fixed table, looked up in both
//! directions.

const PAIRS: &[(&str, &str)] = &[
    ("color", "colour"),
    ("favor", "favour"),
    ("honor", "honour"),
    ("labor", "labour"),
    ("flavor", "flavour"),
    ("humor", "humour"),
    ("neighbor", "neighbour"),
    ("behavior", "behaviour"),
    ("center", "centre"),
    ("meter", "metre"),
    ("kilometer", "kilometre"),
    ("liter", "litre"),
    ("fiber", "fibre"),
    ("theater", "theatre"),
    ("analyze", "analyse"),
    ("realize", "realise"),
    ("organize", "organise"),
    ("recognize", "recognise"),
    ("catalog", "catalogue"),
    ("dialog", "dialogue"),
    ("defense", "defence"),
    ("offense", "offence"),
    ("license", "licence"),
    ("gray", "grey"),
];

/// The other side of a known US/UK pair, if any.
pub(crate) fn counterpart(word: &str) -> Option<&'static str> {
    for (us, uk) in PAIRS {
        if word == *us {
            return Some(uk);
        }
        if word == *uk {
            return Some(us);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_directions() {
        assert_eq!(counterpart("color"), Some("colour"));
        assert_eq!(counterpart("colour"), Some("color"));
        assert_eq!(counterpart("metre"), Some("meter"));
        assert_eq!(counterpart("word"), None);
    }
}

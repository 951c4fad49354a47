use super::Cell;

/// Keep only ASCII digits and decimal points.
pub fn strip_to_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Reduce a cell to a number. Anything that does not leave exactly one
/// parsable number (empty, a lone `.`, several `.`) becomes `Missing`.
pub fn clean_numeric(cell: &Cell) -> Cell {
    let text = match cell.to_text() {
        Some(t) => t,
        None => return Cell::Missing,
    };
    let stripped = strip_to_numeric(&text);
    if stripped.matches('.').count() > 1 {
        return Cell::Missing;
    }
    match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_and_units() {
        assert_eq!(strip_to_numeric("$1,234.56 sqft"), "1234.56");
        assert_eq!(clean_numeric(&Cell::from("$1,234.56 sqft")), Cell::Number(1234.56));
        assert_eq!(clean_numeric(&Cell::from("1,200 sqft")), Cell::Number(1200.0));
    }

    #[test]
    fn empty_and_na_become_missing() {
        assert_eq!(clean_numeric(&Cell::Text(String::new())), Cell::Missing);
        assert_eq!(clean_numeric(&Cell::Text("N/A".into())), Cell::Missing);
        assert_eq!(clean_numeric(&Cell::Text("call agent".into())), Cell::Missing);
        assert_eq!(clean_numeric(&Cell::Missing), Cell::Missing);
    }

    #[test]
    fn two_decimal_points_are_unparsable() {
        assert_eq!(clean_numeric(&Cell::Text("12.3.4".into())), Cell::Missing);
        assert_eq!(clean_numeric(&Cell::Text(".".into())), Cell::Missing);
    }

    #[test]
    fn sign_and_exponent_are_stripped() {
        assert_eq!(clean_numeric(&Cell::Text("-5".into())), Cell::Number(5.0));
        assert_eq!(clean_numeric(&Cell::Text("1e3".into())), Cell::Number(13.0));
    }

    #[test]
    fn cleaning_is_idempotent() {
        for raw in ["$1,234.56", "3 ½", "12.3.4", "", "0.5", "1,000,000"] {
            let once = clean_numeric(&Cell::Text(raw.into()));
            let twice = clean_numeric(&once);
            assert_eq!(once, twice, "input {:?}", raw);
        }
        assert_eq!(clean_numeric(&Cell::Number(2.0)), Cell::Number(2.0));
    }
}

//! Built-in ISO 4217 baseline table.
//!
//! Columns: code, numeric code, decimal places (-1 for pseudo-currencies),
//! countries.

use ducat_shared::CurrencyRecord;

type Row = (&'static str, u16, i32, &'static [&'static str]);

const BASELINE: &[Row] = &[
    ("AED", 784, 2, &["AE"]),
    ("ARS", 32, 2, &["AR"]),
    ("AUD", 36, 2, &["AU", "CX", "CC", "HM", "KI", "NR", "NF", "TV"]),
    ("BGN", 975, 2, &["BG"]),
    ("BHD", 48, 3, &["BH"]),
    ("BRL", 986, 2, &["BR"]),
    ("CAD", 124, 2, &["CA"]),
    ("CHF", 756, 2, &["CH", "LI"]),
    ("CLF", 990, 4, &[]),
    ("CLP", 152, 0, &["CL"]),
    ("CNY", 156, 2, &["CN"]),
    ("COP", 170, 2, &["CO"]),
    ("CZK", 203, 2, &["CZ"]),
    ("DKK", 208, 2, &["DK", "FO", "GL"]),
    ("EGP", 818, 2, &["EG"]),
    ("EUR", 978, 2, &[
        "AD", "AT", "BE", "CY", "DE", "EE", "ES", "FI", "FR", "GR", "HR", "IE", "IT", "LT",
        "LU", "LV", "MC", "ME", "MT", "NL", "PT", "SI", "SK", "SM", "VA",
    ]),
    ("GBP", 826, 2, &["GB", "IM", "JE", "GG"]),
    ("HKD", 344, 2, &["HK"]),
    ("HUF", 348, 2, &["HU"]),
    ("IDR", 360, 2, &["ID"]),
    ("ILS", 376, 2, &["IL"]),
    ("INR", 356, 2, &["IN", "BT"]),
    ("IQD", 368, 3, &["IQ"]),
    ("ISK", 352, 0, &["IS"]),
    ("JOD", 400, 3, &["JO"]),
    ("JPY", 392, 0, &["JP"]),
    ("KRW", 410, 0, &["KR"]),
    ("KWD", 414, 3, &["KW"]),
    ("LYD", 434, 3, &["LY"]),
    ("MXN", 484, 2, &["MX"]),
    ("MYR", 458, 2, &["MY"]),
    ("NGN", 566, 2, &["NG"]),
    ("NOK", 578, 2, &["NO", "SJ", "BV"]),
    ("NZD", 554, 2, &["NZ", "CK", "NU", "PN", "TK"]),
    ("OMR", 512, 3, &["OM"]),
    ("PEN", 604, 2, &["PE"]),
    ("PHP", 608, 2, &["PH"]),
    ("PKR", 586, 2, &["PK"]),
    ("PLN", 985, 2, &["PL"]),
    ("QAR", 634, 2, &["QA"]),
    ("RON", 946, 2, &["RO"]),
    ("RSD", 941, 2, &["RS"]),
    ("SAR", 682, 2, &["SA"]),
    ("SEK", 752, 2, &["SE"]),
    ("SGD", 702, 2, &["SG"]),
    ("THB", 764, 2, &["TH"]),
    ("TND", 788, 3, &["TN"]),
    ("TRY", 949, 2, &["TR"]),
    ("TWD", 901, 2, &["TW"]),
    ("UAH", 980, 2, &["UA"]),
    ("USD", 840, 2, &[
        "US", "AS", "EC", "FM", "GU", "MH", "MP", "PR", "PW", "SV", "TC", "TL", "UM", "VG", "VI",
    ]),
    ("UYU", 858, 2, &["UY"]),
    ("VND", 704, 0, &["VN"]),
    ("XAF", 950, 0, &["CM", "CF", "CG", "GA", "GQ", "TD"]),
    ("XAG", 961, -1, &[]),
    ("XAU", 959, -1, &[]),
    ("XOF", 952, 0, &["BJ", "BF", "CI", "GW", "ML", "NE", "SN", "TG"]),
    ("XPD", 964, -1, &[]),
    ("XPT", 962, -1, &[]),
    ("XXX", 999, -1, &[]),
    ("ZAR", 710, 2, &["ZA", "LS", "NA"]),
];

/// The built-in baseline as data records.
#[must_use]
pub fn baseline_records() -> Vec<CurrencyRecord> {
    BASELINE
        .iter()
        .map(|(code, numeric, places, countries)| {
            CurrencyRecord::new(code, Some(*numeric), *places).with_countries(countries)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use std::collections::HashSet;

    #[test]
    fn test_baseline_records_are_valid() {
        for record in baseline_records() {
            assert!(
                Currency::from_record(&record).is_ok(),
                "invalid baseline record {record:?}"
            );
        }
    }

    #[test]
    fn test_baseline_codes_and_numbers_unique() {
        let records = baseline_records();
        let codes: HashSet<_> = records.iter().map(|r| r.code.clone()).collect();
        let numbers: HashSet<_> = records.iter().map(|r| r.numeric_code).collect();
        assert_eq!(codes.len(), records.len());
        assert_eq!(numbers.len(), records.len());
    }
}

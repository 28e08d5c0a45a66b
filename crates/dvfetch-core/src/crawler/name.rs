//! File-name conventions of the listing API.
//!
//! Published names look like `<TYPE>_<account>_<source>_<YYYYMMDD>.<ext>`;
//! the cleaned form drops the account token: `<TYPE>_<source>_<YYYYMMDD>.<ext>`.

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Drops the account token from a four-part name. Other names are returned as is.
pub fn clean_raw_filename(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('_').collect();
    if parts.len() == 4 {
        [parts[0], parts[2], parts[3]].join("_")
    } else {
        raw.to_string()
    }
}

/// Source id: the second `_` token of a cleaned name.
pub fn parse_source_id(file_name: &str) -> Result<u32> {
    let token = file_name
        .split('_')
        .nth(1)
        .with_context(|| format!("no source id in file name: {}", file_name))?;
    token
        .parse()
        .with_context(|| format!("invalid source id {:?} in file name: {}", token, file_name))
}

/// Reference date: the third `_` token of a cleaned name, up to the first `.`.
pub fn parse_reference_date(file_name: &str) -> Result<NaiveDate> {
    let token = file_name
        .split('_')
        .nth(2)
        .and_then(|t| t.split('.').next())
        .with_context(|| format!("no reference date in file name: {}", file_name))?;
    NaiveDate::parse_from_str(token, "%Y%m%d")
        .with_context(|| format!("invalid reference date {:?} in file name: {}", token, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_token_is_dropped() {
        assert_eq!(
            clean_raw_filename("WATCHLIST_username_676_20200610.txt.bz2"),
            "WATCHLIST_676_20200610.txt.bz2"
        );
        for name in [
            "CROSSREF_903_20200610.txt.bz2",
            "COREREF_945_20200610.txt.bz2",
            "REPLAY_794_20200316.txt.bz2",
        ] {
            assert_eq!(clean_raw_filename(name), name);
        }
    }

    #[test]
    fn source_and_date_from_cleaned_name() {
        let name = "WATCHLIST_945_20201201.txt.bz2";
        assert_eq!(parse_source_id(name).unwrap(), 945);
        assert_eq!(
            parse_reference_date(name).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 1).unwrap()
        );
    }

    #[test]
    fn malformed_names_are_errors() {
        assert!(parse_source_id("WATCHLIST").is_err());
        assert!(parse_source_id("WATCHLIST_abc_20201201.txt").is_err());
        assert!(parse_reference_date("WATCHLIST_945").is_err());
        assert!(parse_reference_date("WATCHLIST_945_2020-12-01.txt").is_err());
    }
}

//! Column-name resolution heuristics.
//!
//! Everything here works on a slice of column names so the heuristics can be
//! exercised without touching files.

/// Canonical identifier column name in every cleaned table.
pub const ID_COLUMN: &str = "sample_id";

pub const METADATA_ID_CANDIDATES: &[&str] = &["sample_alias", "sample_id", "run_accession"];
pub const TAXONOMY_ID_CANDIDATES: &[&str] = &["sample_alias", "sample_id", "sample"];
pub const BMI_NEEDLES: &[&str] = &["bmi", "body_mass"];

/// A resolved column and whether it came from the first-column fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub name: &'a str,
    pub fallback: bool,
}

/// First candidate, in candidate order, that names one of `columns` exactly.
pub fn resolve_candidate<'a, S>(columns: &'a [String], candidates: &[S]) -> Option<&'a str>
where
    S: AsRef<str>,
{
    candidates.iter().find_map(|candidate| {
        columns
            .iter()
            .find(|column| column.as_str() == candidate.as_ref())
            .map(String::as_str)
    })
}

/// Columns whose lowercased name contains any of `needles`, in column order.
pub fn find_matching<'a>(columns: &'a [String], needles: &[&str]) -> Vec<&'a str> {
    columns
        .iter()
        .filter(|column| {
            let lowered = column.to_lowercase();
            needles.iter().any(|needle| lowered.contains(needle))
        })
        .map(String::as_str)
        .collect()
}

pub fn resolve_bmi(columns: &[String]) -> Option<&str> {
    find_matching(columns, BMI_NEEDLES).into_iter().next()
}

/// Candidate match, else the first column marked as a fallback.
pub fn resolve_identifier<'a, S>(columns: &'a [String], candidates: &[S]) -> Option<Resolved<'a>>
where
    S: AsRef<str>,
{
    if let Some(name) = resolve_candidate(columns, candidates) {
        return Some(Resolved {
            name,
            fallback: false,
        });
    }
    columns.first().map(|name| Resolved {
        name: name.as_str(),
        fallback: true,
    })
}

/// Splits a comma-separated candidate list, dropping blanks.
pub fn parse_candidate_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|s| s.split(','))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn candidate_priority_wins_over_column_order() {
        let cols = columns(&["run_accession", "sample_id", "sample_alias"]);
        assert_eq!(
            resolve_candidate(&cols, METADATA_ID_CANDIDATES),
            Some("sample_alias")
        );
    }

    #[test]
    fn candidates_match_exactly() {
        let cols = columns(&["Sample_ID", "sample_id_v2"]);
        assert_eq!(resolve_candidate(&cols, METADATA_ID_CANDIDATES), None);
    }

    #[test]
    fn identifier_falls_back_to_first_column() {
        let cols = columns(&["accession", "bmi"]);
        assert_eq!(
            resolve_identifier(&cols, METADATA_ID_CANDIDATES),
            Some(Resolved {
                name: "accession",
                fallback: true
            })
        );
        assert_eq!(resolve_identifier(&[], METADATA_ID_CANDIDATES), None);
    }

    #[test]
    fn bmi_matches_substrings_case_insensitively() {
        let cols = columns(&["sample_id", "age", "Body_Mass_Index", "BMI_kg_m2"]);
        assert_eq!(resolve_bmi(&cols), Some("Body_Mass_Index"));
        assert_eq!(
            find_matching(&cols, BMI_NEEDLES),
            vec!["Body_Mass_Index", "BMI_kg_m2"]
        );
    }

    #[test]
    fn bmi_absent_resolves_to_none() {
        assert_eq!(resolve_bmi(&columns(&["sample_id", "weight"])), None);
    }

    #[test]
    fn candidate_list_splits_on_commas() {
        let parsed = parse_candidate_list(&["a, b".to_string(), ",c,".to_string()]);
        assert_eq!(parsed, vec!["a", "b", "c"]);
    }
}

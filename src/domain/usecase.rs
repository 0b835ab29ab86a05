//! Project use cases and the skip sizes recommended for each.

/// A typical kind of job and the skip sizes suited to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCase {
    pub label: &'static str,
    pub sizes: &'static [u32],
}

/// The fixed recommendation table shown next to the catalog.
pub const USE_CASES: [UseCase; 4] = [
    UseCase {
        label: "Small Home Projects",
        sizes: &[4, 6],
    },
    UseCase {
        label: "Family Renovations",
        sizes: &[8, 10],
    },
    UseCase {
        label: "Large Construction",
        sizes: &[12, 14, 16],
    },
    UseCase {
        label: "Commercial Projects",
        sizes: &[20, 40],
    },
];

impl UseCase {
    #[must_use]
    pub fn recommends(&self, size: u32) -> bool {
        self.sizes.contains(&size)
    }
}

/// Use cases recommending a skip of `size` yards.
#[must_use]
pub fn recommended_use_cases(size: u32) -> Vec<&'static UseCase> {
    USE_CASES.iter().filter(|use_case| use_case.recommends(size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_map_to_their_use_case() {
        let labels: Vec<&str> = recommended_use_cases(8).iter().map(|u| u.label).collect();
        assert_eq!(labels, vec!["Family Renovations"]);

        assert_eq!(recommended_use_cases(40)[0].label, "Commercial Projects");
    }

    #[test]
    fn unlisted_sizes_have_no_recommendation() {
        assert!(recommended_use_cases(5).is_empty());
    }
}

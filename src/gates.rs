use anyhow::{bail, Context, Result};
use semver::Version;
use std::collections::BTreeMap;

/// Display strategy selected by a version gate. `Legacy` prints the raw
/// response verbatim; `Structured` parses and renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Legacy,
    Structured,
}

/// Half-open version interval `[min, max)` parsed from a range string such as
/// `">=0.0.15 <0.0.17"` or `">=0.0.17"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRange {
    min: Version,
    max: Option<Version>,
}

impl GateRange {
    pub fn parse(range: &str) -> Result<GateRange> {
        let mut min = None;
        let mut max = None;
        for part in range.split_whitespace() {
            if let Some(v) = part.strip_prefix(">=") {
                if min.is_some() {
                    bail!("duplicate lower bound in version range {:?}", range);
                }
                min = Some(
                    Version::parse(v)
                        .with_context(|| format!("invalid version in range {:?}", range))?,
                );
            } else if let Some(v) = part.strip_prefix('<') {
                if max.is_some() {
                    bail!("duplicate upper bound in version range {:?}", range);
                }
                max = Some(
                    Version::parse(v)
                        .with_context(|| format!("invalid version in range {:?}", range))?,
                );
            } else {
                bail!("unsupported comparator {:?} in version range {:?}", part, range);
            }
        }
        let min = min.with_context(|| format!("version range {:?} has no lower bound", range))?;
        if let Some(max) = &max {
            if *max <= min {
                bail!("empty version range {:?}", range);
            }
        }
        Ok(GateRange { min, max })
    }

    pub fn contains(&self, v: &Version) -> bool {
        *v >= self.min && self.max.as_ref().map_or(true, |max| v < max)
    }

    /// Two half-open intervals [a,b) and [c,d) intersect iff a < d and c < b.
    fn overlaps(&self, other: &GateRange) -> bool {
        let below_other = other.max.as_ref().map_or(true, |max| self.min < *max);
        let other_below = self.max.as_ref().map_or(true, |max| other.min < *max);
        below_other && other_below
    }
}

#[derive(Debug, Clone)]
struct Gate {
    range: GateRange,
    mode: DisplayMode,
}

/// Registered display gates for every version-sensitive command. Built once
/// at startup; construction fails on malformed range strings, duplicate
/// command registrations, or overlapping ranges for one command.
#[derive(Debug)]
pub struct GateTable {
    commands: BTreeMap<&'static str, Vec<Gate>>,
}

/// Outcome of negotiating one command against the effective version. The
/// negotiator itself never fails: a command with no matching range reports
/// `mode: None` and the dispatcher decides how to surface that.
#[derive(Debug)]
pub struct Resolution {
    pub requirement_met: bool,
    pub mode: Option<DisplayMode>,
    pub min_required: Option<Version>,
}

impl GateTable {
    pub fn build(
        entries: impl IntoIterator<Item = (&'static str, &'static [(&'static str, DisplayMode)])>,
    ) -> Result<GateTable> {
        let mut commands: BTreeMap<&'static str, Vec<Gate>> = BTreeMap::new();
        for (command, gates) in entries {
            if commands.contains_key(command) {
                bail!("command {:?} registered twice in the gate table", command);
            }
            if gates.is_empty() {
                bail!("command {:?} registered with no version ranges", command);
            }
            let mut parsed = Vec::with_capacity(gates.len());
            for (range, mode) in gates {
                let range = GateRange::parse(range)
                    .with_context(|| format!("bad version gate for command {:?}", command))?;
                parsed.push(Gate { range, mode: *mode });
            }
            for i in 0..parsed.len() {
                for j in i + 1..parsed.len() {
                    if parsed[i].range.overlaps(&parsed[j].range) {
                        bail!(
                            "overlapping version ranges registered for command {:?}",
                            command
                        );
                    }
                }
            }
            commands.insert(command, parsed);
        }
        Ok(GateTable { commands })
    }

    /// Resolve the display mode for `command` under `effective`. Unregistered
    /// commands carry no constraint and render structured.
    pub fn resolve(&self, command: &str, effective: &Version) -> Resolution {
        let Some(gates) = self.commands.get(command) else {
            return Resolution {
                requirement_met: true,
                mode: Some(DisplayMode::Structured),
                min_required: None,
            };
        };

        let min_required = gates.iter().map(|g| g.range.min.clone()).min();

        // Disjointness is enforced at build time, so at most one range matches.
        let matched = gates.iter().find(|g| g.range.contains(effective));
        Resolution {
            requirement_met: matched.is_some(),
            mode: matched.map(|g| g.mode),
            min_required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::DisplayMode::{Legacy, Structured};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn sample_table() -> GateTable {
        GateTable::build([
            (
                "rollback_database-cr",
                &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)][..],
            ),
            ("get_accounts", &[(">=0.1.7", Structured)][..]),
            (
                "apply_database-cr",
                &[(">=0.0.14 <0.0.17", Legacy), (">=0.0.17", Structured)][..],
            ),
        ])
        .unwrap()
    }

    // --- range parsing ---

    #[test]
    fn parse_min_only() {
        let range = GateRange::parse(">=0.0.17").unwrap();
        assert!(range.contains(&v("0.0.17")));
        assert!(range.contains(&v("2.0.0")));
        assert!(!range.contains(&v("0.0.16")));
    }

    #[test]
    fn parse_min_and_max_is_half_open() {
        let range = GateRange::parse(">=0.0.15 <0.0.17").unwrap();
        assert!(range.contains(&v("0.0.15")));
        assert!(range.contains(&v("0.0.16")));
        assert!(!range.contains(&v("0.0.17")));
    }

    #[test]
    fn parse_rejects_malformed_ranges() {
        assert!(GateRange::parse("banana").is_err());
        assert!(GateRange::parse("0.0.15").is_err());
        assert!(GateRange::parse(">=x.y.z").is_err());
        assert!(GateRange::parse("<0.0.17").is_err());
        assert!(GateRange::parse(">=0.0.17 <0.0.15").is_err());
        assert!(GateRange::parse(">=0.0.15 >=0.0.16").is_err());
    }

    // --- overlap detection ---

    #[test]
    fn build_rejects_overlapping_ranges() {
        let err = GateTable::build([(
            "rollback_database-cr",
            &[(">=0.0.15 <0.0.18", Legacy), (">=0.0.17", Structured)][..],
        )])
        .unwrap_err();
        assert!(err.to_string().contains("overlapping"));
    }

    #[test]
    fn build_rejects_duplicate_commands() {
        let err = GateTable::build([
            ("restart_database", &[(">=0.1.6", Structured)][..]),
            ("restart_database", &[(">=0.1.7", Structured)][..]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn build_rejects_malformed_range_in_table() {
        let err = GateTable::build([("get_accounts", &[("around 0.1.7", Structured)][..])])
            .unwrap_err();
        assert!(err.to_string().contains("get_accounts"));
    }

    #[test]
    fn adjacent_ranges_are_disjoint() {
        // [0.0.15, 0.0.17) and [0.0.17, ...) share a boundary but not a version
        GateTable::build([(
            "versions_default-cr",
            &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)][..],
        )])
        .unwrap();
    }

    // --- resolution ---

    #[test]
    fn legacy_range_wins_for_old_server() {
        let table = sample_table();
        let res = table.resolve("rollback_database-cr", &v("0.0.16"));
        assert!(res.requirement_met);
        assert_eq!(res.mode, Some(Legacy));
    }

    #[test]
    fn legacy_range_wins_for_wider_lower_bound() {
        let table = sample_table();
        let res = table.resolve("apply_database-cr", &v("0.0.16"));
        assert_eq!(res.mode, Some(Legacy));
    }

    #[test]
    fn structured_range_wins_at_boundary() {
        let table = sample_table();
        let res = table.resolve("rollback_database-cr", &v("0.0.17"));
        assert_eq!(res.mode, Some(Structured));
    }

    #[test]
    fn single_range_command_resolves_structured() {
        let table = sample_table();
        let res = table.resolve("get_accounts", &v("0.1.8"));
        assert!(res.requirement_met);
        assert_eq!(res.mode, Some(Structured));
    }

    #[test]
    fn too_old_server_reports_unmet_requirement() {
        let table = sample_table();
        let res = table.resolve("get_accounts", &v("0.1.6"));
        assert!(!res.requirement_met);
        assert_eq!(res.mode, None);
        assert_eq!(res.min_required, Some(v("0.1.7")));
    }

    #[test]
    fn unregistered_command_is_unconstrained() {
        let table = sample_table();
        let res = table.resolve("rollback_cm-settings", &v("0.0.1"));
        assert!(res.requirement_met);
        assert_eq!(res.mode, Some(Structured));
        assert_eq!(res.min_required, None);
    }

    #[test]
    fn min_required_is_smallest_lower_bound() {
        let table = sample_table();
        let res = table.resolve("apply_database-cr", &v("0.0.10"));
        assert_eq!(res.min_required, Some(v("0.0.14")));
    }
}

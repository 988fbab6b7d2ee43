//! Section layout of a generated `StrategyArtifact` (spec §6.5). Validation
//! and normalization both need to slice the artifact by its `##` headers;
//! this module is the single place that knows the heading text.

pub const SECTION_CONTENT_PILLARS: &str = "## Content Pillars";
pub const SECTION_POSTING_CADENCE: &str = "## Posting Cadence";
pub const SECTION_SCHEDULE: &str = "## 2-Week Schedule";
pub const SECTION_AB_TEST: &str = "## A/B Test Plan";
pub const SECTION_HOOK_IDEAS: &str = "## Hook Ideas";
pub const SECTION_HASHTAG_PACK: &str = "## Hashtag Pack";

/// One `##`-delimited section: the heading line and its body, in source order.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Split an artifact into its `##` sections. Any text before the first
/// heading is returned as a section with an empty heading.
pub fn split_sections(artifact: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_heading = String::new();
    let mut current_body = String::new();
    let mut started = false;

    for line in artifact.lines() {
        if line.starts_with("## ") {
            if started || !current_body.trim().is_empty() {
                sections.push(Section {
                    heading: current_heading.clone(),
                    body: current_body.trim_end().to_string(),
                });
            }
            current_heading = line.trim_end().to_string();
            current_body.clear();
            started = true;
        } else {
            current_body.push_str(line);
            current_body.push('\n');
        }
    }
    sections.push(Section {
        heading: current_heading,
        body: current_body.trim_end().to_string(),
    });
    sections
}

/// Find the body of the section whose heading starts with `prefix`.
pub fn section_body<'a>(sections: &'a [Section], prefix: &str) -> Option<&'a str> {
    sections
        .iter()
        .find(|s| s.heading.starts_with(prefix))
        .map(|s| s.body.as_str())
}

/// True if `line` falls inside the Hashtag Pack section of `artifact`,
/// used by checks that must exempt the pack from general scanning.
pub fn is_hashtag_pack_heading(line: &str) -> bool {
    line.trim_start().starts_with(SECTION_HASHTAG_PACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "## Content Pillars\n- a\n- b\n- c\n\n## Hashtag Pack (1-5 tags, NO competitor tags)\n#gamedev #indiegame\n";

    #[test]
    fn splits_by_heading() {
        let sections = split_sections(SAMPLE);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "## Content Pillars");
        assert!(sections[0].body.contains("- a"));
        assert!(sections[1].heading.starts_with(SECTION_HASHTAG_PACK));
    }

    #[test]
    fn finds_section_body_by_prefix() {
        let sections = split_sections(SAMPLE);
        let body = section_body(&sections, SECTION_HASHTAG_PACK).unwrap();
        assert!(body.contains("#gamedev"));
    }
}

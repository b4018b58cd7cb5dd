//! Mock form catalog
//!
//! Static lookup data behind the dropdown endpoints:
//! - Countries and their states/provinces (cascading dropdowns)
//! - Departments and their teams
//! - Skills (searchable, filterable by category)
//! - 500 generated job titles (progressive loading)

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::types::{Country, Department, JobTitle, Page, Region, Skill, Team};

pub const DEFAULT_SKILL_LIMIT: usize = 20;
pub const DEFAULT_JOB_TITLE_LIMIT: usize = 50;
pub const JOB_TITLE_COUNT: usize = 500;

const JOB_DEPARTMENTS: [&str; 5] = ["Engineering", "Sales", "Marketing", "HR", "Finance"];
const JOB_LEVELS: [&str; 5] = ["Junior", "Mid", "Senior", "Lead", "Principal"];

static COUNTRIES: Lazy<Vec<Country>> = Lazy::new(|| {
    [
        ("US", "United States", true, false),
        ("CA", "Canada", false, true),
        ("UK", "United Kingdom", false, false),
        ("DE", "Germany", false, false),
        ("FR", "France", false, false),
        ("JP", "Japan", false, false),
        ("AU", "Australia", true, false),
        ("BR", "Brazil", true, false),
        ("IN", "India", true, false),
        ("CN", "China", false, true),
    ]
    .into_iter()
    .map(|(id, name, has_states, has_provinces)| Country {
        id: id.to_string(),
        name: name.to_string(),
        has_states,
        has_provinces,
    })
    .collect()
});

static STATES: Lazy<HashMap<&'static str, Vec<Region>>> = Lazy::new(|| {
    let table: [(&str, &[(&str, &str)]); 3] = [
        (
            "US",
            &[
                ("CA", "California"),
                ("NY", "New York"),
                ("TX", "Texas"),
                ("FL", "Florida"),
                ("IL", "Illinois"),
                ("PA", "Pennsylvania"),
                ("OH", "Ohio"),
                ("GA", "Georgia"),
                ("NC", "North Carolina"),
                ("MI", "Michigan"),
            ],
        ),
        (
            "CA",
            &[
                ("ON", "Ontario"),
                ("QC", "Quebec"),
                ("BC", "British Columbia"),
                ("AB", "Alberta"),
                ("MB", "Manitoba"),
                ("SK", "Saskatchewan"),
            ],
        ),
        (
            "AU",
            &[
                ("NSW", "New South Wales"),
                ("VIC", "Victoria"),
                ("QLD", "Queensland"),
                ("WA", "Western Australia"),
                ("SA", "South Australia"),
                ("TAS", "Tasmania"),
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(country, rows)| {
            let regions = rows
                .iter()
                .map(|(id, name)| Region {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect();
            (country, regions)
        })
        .collect()
});

static DEPARTMENTS: Lazy<Vec<Department>> = Lazy::new(|| {
    [
        ("eng", "Engineering", true),
        ("sales", "Sales", true),
        ("marketing", "Marketing", true),
        ("hr", "Human Resources", false),
        ("finance", "Finance", false),
        ("ops", "Operations", true),
        ("legal", "Legal", false),
        ("product", "Product", true),
    ]
    .into_iter()
    .map(|(id, name, has_teams)| Department {
        id: id.to_string(),
        name: name.to_string(),
        has_teams,
    })
    .collect()
});

static TEAMS: Lazy<HashMap<&'static str, Vec<Team>>> = Lazy::new(|| {
    let table: [(&str, &[(&str, &str)]); 5] = [
        (
            "eng",
            &[
                ("frontend", "Frontend Development"),
                ("backend", "Backend Development"),
                ("devops", "DevOps"),
                ("qa", "Quality Assurance"),
                ("security", "Security"),
            ],
        ),
        (
            "sales",
            &[
                ("enterprise", "Enterprise Sales"),
                ("smb", "SMB Sales"),
                ("channel", "Channel Partners"),
            ],
        ),
        (
            "marketing",
            &[
                ("content", "Content Marketing"),
                ("demand", "Demand Generation"),
                ("brand", "Brand Marketing"),
                ("product-marketing", "Product Marketing"),
            ],
        ),
        (
            "ops",
            &[
                ("it", "IT Operations"),
                ("facilities", "Facilities"),
                ("procurement", "Procurement"),
            ],
        ),
        (
            "product",
            &[
                ("design", "Product Design"),
                ("research", "User Research"),
                ("analytics", "Product Analytics"),
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(dept, rows)| {
            let teams = rows
                .iter()
                .map(|(id, name)| Team {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect();
            (dept, teams)
        })
        .collect()
});

static SKILLS: Lazy<Vec<Skill>> = Lazy::new(|| {
    [
        ("js", "JavaScript", "Programming"),
        ("python", "Python", "Programming"),
        ("java", "Java", "Programming"),
        ("react", "React", "Framework"),
        ("angular", "Angular", "Framework"),
        ("vue", "Vue.js", "Framework"),
        ("node", "Node.js", "Runtime"),
        ("docker", "Docker", "DevOps"),
        ("k8s", "Kubernetes", "DevOps"),
        ("aws", "AWS", "Cloud"),
        ("azure", "Azure", "Cloud"),
        ("gcp", "Google Cloud", "Cloud"),
    ]
    .into_iter()
    .map(|(id, name, category)| Skill {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    })
    .collect()
});

static JOB_TITLES: Lazy<Vec<JobTitle>> = Lazy::new(|| (1..=JOB_TITLE_COUNT).map(job_title).collect());

/// Deterministic stand-in for the randomly drawn department/level pairs:
/// departments cycle every title, levels every five titles.
fn job_title(i: usize) -> JobTitle {
    JobTitle {
        id: format!("job-{i}"),
        name: format!("Job Title {i}"),
        department: JOB_DEPARTMENTS[(i - 1) % JOB_DEPARTMENTS.len()].to_string(),
        level: JOB_LEVELS[((i - 1) / JOB_DEPARTMENTS.len()) % JOB_LEVELS.len()].to_string(),
    }
}

/// Query for `/api/form-data/skills`
#[derive(Debug, Clone, Deserialize)]
pub struct SkillQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_skill_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for SkillQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            limit: DEFAULT_SKILL_LIMIT,
            offset: 0,
        }
    }
}

/// Query for `/api/form-data/job-titles`
#[derive(Debug, Clone, Deserialize)]
pub struct JobTitleQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_job_title_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for JobTitleQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            limit: DEFAULT_JOB_TITLE_LIMIT,
            offset: 0,
        }
    }
}

fn default_skill_limit() -> usize {
    DEFAULT_SKILL_LIMIT
}

fn default_job_title_limit() -> usize {
    DEFAULT_JOB_TITLE_LIMIT
}

pub fn countries() -> &'static [Country] {
    &COUNTRIES
}

/// States/provinces for a country id. Unknown ids yield an empty slice.
pub fn states(country_id: &str) -> &'static [Region] {
    STATES.get(country_id).map(Vec::as_slice).unwrap_or(&[])
}

pub fn departments() -> &'static [Department] {
    &DEPARTMENTS
}

/// Teams for a department id. Unknown ids yield an empty slice.
pub fn teams(department_id: &str) -> &'static [Team] {
    TEAMS.get(department_id).map(Vec::as_slice).unwrap_or(&[])
}

pub fn skills() -> &'static [Skill] {
    &SKILLS
}

pub fn job_titles() -> &'static [JobTitle] {
    &JOB_TITLES
}

/// Find a country by id or display name, ignoring case.
pub fn find_country(key: &str) -> Option<&'static Country> {
    let key = key.trim();
    COUNTRIES
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(key))
        .or_else(|| COUNTRIES.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
}

/// Find a department by id or display name, ignoring case.
pub fn find_department(key: &str) -> Option<&'static Department> {
    let key = key.trim();
    DEPARTMENTS
        .iter()
        .find(|d| d.id.eq_ignore_ascii_case(key))
        .or_else(|| DEPARTMENTS.iter().find(|d| d.name.eq_ignore_ascii_case(key)))
}

pub fn search_skills(query: &SkillQuery) -> Page<Skill> {
    let needle = query.search.to_lowercase();
    let matches: Vec<Skill> = SKILLS
        .iter()
        .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
        .filter(|s| query.category.is_empty() || s.category == query.category)
        .cloned()
        .collect();

    Page::slice(&matches, query.offset, query.limit)
}

pub fn search_job_titles(query: &JobTitleQuery) -> Page<JobTitle> {
    let needle = query.search.to_lowercase();
    let matches: Vec<JobTitle> = JOB_TITLES
        .iter()
        .filter(|j| {
            needle.is_empty()
                || j.name.to_lowercase().contains(&needle)
                || j.department.to_lowercase().contains(&needle)
                || j.level.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    Page::slice(&matches, query.offset, query.limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(countries().len(), 10);
        assert_eq!(departments().len(), 8);
        assert_eq!(skills().len(), 12);
        assert_eq!(job_titles().len(), JOB_TITLE_COUNT);
    }

    #[test]
    fn test_states_lookup() {
        assert_eq!(states("US").len(), 10);
        assert_eq!(states("CA")[0].name, "Ontario");
        assert!(states("UK").is_empty());
        // exact id match only
        assert!(states("us").is_empty());
    }

    #[test]
    fn test_subdivision_flags_match_state_table() {
        for country in countries() {
            if !states(&country.id).is_empty() {
                assert!(country.has_subdivisions(), "{} has states but no flag", country.id);
            }
        }
    }

    #[test]
    fn test_teams_only_for_flagged_departments() {
        for dept in departments() {
            assert_eq!(dept.has_teams, !teams(&dept.id).is_empty(), "{}", dept.id);
        }
        assert!(teams("unknown").is_empty());
    }

    #[test]
    fn test_find_country_case_insensitive() {
        assert_eq!(find_country("us").unwrap().id, "US");
        assert_eq!(find_country("  united states ").unwrap().id, "US");
        assert_eq!(find_country("CANADA").unwrap().id, "CA");
        assert!(find_country("Atlantis").is_none());
    }

    #[test]
    fn test_find_department_by_name() {
        assert_eq!(find_department("Engineering").unwrap().id, "eng");
        assert_eq!(find_department("OPS").unwrap().id, "ops");
    }

    #[test]
    fn test_search_skills_by_name_and_category() {
        let page = search_skills(&SkillQuery {
            search: "JA".into(),
            ..Default::default()
        });
        let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["JavaScript", "Java"]);
        assert_eq!(page.total, 2);
        assert!(!page.has_more);

        let page = search_skills(&SkillQuery {
            category: "Cloud".into(),
            ..Default::default()
        });
        assert_eq!(page.total, 3);

        // category match is exact
        let page = search_skills(&SkillQuery {
            category: "cloud".into(),
            ..Default::default()
        });
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_search_skills_paging() {
        let page = search_skills(&SkillQuery {
            limit: 5,
            offset: 10,
            ..Default::default()
        });
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 12);
        assert!(!page.has_more);

        let page = search_skills(&SkillQuery {
            limit: 5,
            ..Default::default()
        });
        assert!(page.has_more);
    }

    #[test]
    fn test_job_titles_are_deterministic() {
        let first = &job_titles()[0];
        assert_eq!(first.id, "job-1");
        assert_eq!(first.department, "Engineering");
        assert_eq!(first.level, "Junior");
        let sixth = &job_titles()[5];
        assert_eq!(sixth.department, "Engineering");
        assert_eq!(sixth.level, "Mid");
    }

    #[test]
    fn test_search_job_titles_matches_level_and_department() {
        let default_page = search_job_titles(&JobTitleQuery::default());
        assert_eq!(default_page.items.len(), DEFAULT_JOB_TITLE_LIMIT);
        assert_eq!(default_page.total, JOB_TITLE_COUNT);
        assert!(default_page.has_more);

        let by_level = search_job_titles(&JobTitleQuery {
            search: "principal".into(),
            limit: 1000,
            offset: 0,
        });
        assert_eq!(by_level.total, JOB_TITLE_COUNT / 5);
        assert!(by_level.items.iter().all(|j| j.level == "Principal"));

        let by_name = search_job_titles(&JobTitleQuery {
            search: "title 250".into(),
            ..Default::default()
        });
        assert_eq!(by_name.total, 1);
        assert_eq!(by_name.items[0].id, "job-250");
    }
}

//! Relational metadata extracts
//!
//! Three flat tables describe which packages are in a deployment, which
//! categories each package carries, and which content sits in each category.
//! The same schemas are used per build and after merging at publish time.

use chrono::{Datelike, NaiveDate};

use super::{PackageSpec, CATEGORY_TUTORIAL, CATEGORY_USER_FEEDBACK};

pub const PACKAGES_IN_DEPLOYMENT_CSV: &str = "packagesindeployment.csv";
pub const CATEGORIES_IN_PACKAGES_CSV: &str = "categoriesinpackages.csv";
pub const CONTENT_IN_PACKAGES_CSV: &str = "contentinpackages.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub project: String,
    pub deployment: String,
    pub content_package: String,
    pub package_name: String,
    /// `M/D/YYYY`
    pub start_date: String,
    pub end_date: String,
    pub language_code: String,
    pub group_langs: String,
    pub distribution: String,
}

impl PackageRow {
    pub const HEADER: [&'static str; 9] = [
        "project",
        "deployment",
        "contentpackage",
        "packagename",
        "startDate",
        "endDate",
        "languageCode",
        "grouplangs",
        "distribution",
    ];

    pub fn record(&self) -> [&str; 9] {
        [
            &self.project,
            &self.deployment,
            &self.content_package,
            &self.package_name,
            &self.start_date,
            &self.end_date,
            &self.language_code,
            &self.group_langs,
            &self.distribution,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub project: String,
    pub content_package: String,
    pub category_id: String,
    pub order: usize,
}

impl CategoryRow {
    pub const HEADER: [&'static str; 4] = ["project", "contentpackage", "categoryid", "order"];

    pub fn record(&self) -> [String; 4] {
        [
            self.project.clone(),
            self.content_package.clone(),
            self.category_id.clone(),
            self.order.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRow {
    pub project: String,
    pub content_package: String,
    pub content_id: String,
    pub category_id: String,
    pub order: usize,
}

impl ContentRow {
    pub const HEADER: [&'static str; 5] = [
        "project",
        "contentpackage",
        "contentid",
        "categoryid",
        "order",
    ];

    pub fn record(&self) -> [String; 5] {
        [
            self.project.clone(),
            self.content_package.clone(),
            self.content_id.clone(),
            self.category_id.clone(),
            self.order.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTables {
    packages: Vec<PackageRow>,
    categories: Vec<CategoryRow>,
    content: Vec<ContentRow>,
}

impl MetadataTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows describing one package.
    ///
    /// Category order follows declaration order. Feedback is appended when it
    /// was not declared and is visible; the tutorial is appended when the
    /// package has one. Content order restarts at 1 in every playlist.
    pub fn for_package(
        project: &str,
        deployment: &str,
        package: &PackageSpec,
        start_date: NaiveDate,
    ) -> Self {
        let project = project.to_uppercase();
        let content_package = package.name().to_uppercase();

        let packages = vec![PackageRow {
            project: project.clone(),
            deployment: deployment.to_uppercase(),
            content_package: content_package.clone(),
            package_name: content_package.clone(),
            start_date: format!(
                "{}/{}/{}",
                start_date.month(),
                start_date.day(),
                start_date.year()
            ),
            end_date: String::new(),
            language_code: package.language().to_string(),
            group_langs: package.groups().join(","),
            distribution: String::new(),
        }];

        let mut category_ids: Vec<String> = package
            .categories()
            .into_iter()
            .map(|c| csv_category_id(c).to_string())
            .collect();
        if package.user_feedback_public() && !package.declares_category(CATEGORY_USER_FEEDBACK) {
            category_ids.push(CATEGORY_USER_FEEDBACK.to_string());
        }
        let tutorial = csv_category_id(CATEGORY_TUTORIAL);
        if package.has_tutorial() && !category_ids.iter().any(|c| c == tutorial) {
            category_ids.push(tutorial.to_string());
        }
        let categories = category_ids
            .into_iter()
            .enumerate()
            .map(|(i, category_id)| CategoryRow {
                project: project.clone(),
                content_package: content_package.clone(),
                category_id,
                order: i + 1,
            })
            .collect();

        let content = package
            .playlists()
            .iter()
            .flat_map(|playlist| {
                playlist
                    .items()
                    .iter()
                    .enumerate()
                    .map(move |(i, item)| (playlist.category(), i + 1, item))
            })
            .map(|(category, order, item)| ContentRow {
                project: project.clone(),
                content_package: content_package.clone(),
                content_id: item.id().to_string(),
                category_id: csv_category_id(category).to_string(),
                order,
            })
            .collect();

        Self {
            packages,
            categories,
            content,
        }
    }

    pub fn extend(&mut self, other: MetadataTables) {
        self.packages.extend(other.packages);
        self.categories.extend(other.categories);
        self.content.extend(other.content);
    }

    pub fn packages(&self) -> &[PackageRow] {
        &self.packages
    }

    pub fn categories(&self) -> &[CategoryRow] {
        &self.categories
    }

    pub fn content(&self) -> &[ContentRow] {
        &self.content
    }
}

/// Category ids in the extracts drop the locked-list `$` marker.
fn csv_category_id(category: &str) -> &str {
    category.strip_prefix('$').unwrap_or(category)
}

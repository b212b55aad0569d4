//! Hydration Orchestrator
//!
//! Resolves a page's section list concurrently and reassembles the results
//! in author order. One section's failure never aborts or affects any other
//! section: the failed section stays in the output, flagged and empty.
//!
//! Resolution time per section is unbounded - a slow resolver delays the
//! whole page. Known gap, kept to match the observed design.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use super::resolver::{SectionData, SectionResolver};
use crate::db::models::{Page, Section, SectionType};

/// A section with its resolved data attached. Built fresh from the input
/// section - inputs are never mutated, and `data` is never persisted.
#[derive(Debug, Serialize)]
pub struct HydratedSection {
    pub id: String,
    pub section_type: SectionType,
    pub position: i32,
    pub config: serde_json::Value,
    pub data: SectionData,
    pub error: bool,
}

impl HydratedSection {
    fn resolved(section: &Section, data: SectionData) -> Self {
        Self {
            id: section.id.clone(),
            section_type: section.section_type,
            position: section.position,
            config: section.config.clone(),
            data,
            error: false,
        }
    }

    fn failed(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            section_type: section.section_type,
            position: section.position,
            config: section.config.clone(),
            data: SectionData::empty(),
            error: true,
        }
    }
}

/// A page with every active section hydrated
#[derive(Debug, Serialize)]
pub struct HydratedPage {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub sections: Vec<HydratedSection>,
}

/// Fans section resolution out and reassembles the page
pub struct HydrationOrchestrator {
    resolver: Arc<SectionResolver>,
}

impl HydrationOrchestrator {
    pub fn new(resolver: Arc<SectionResolver>) -> Self {
        Self { resolver }
    }

    /// Hydrate a section list. Inactive sections are skipped entirely;
    /// everything else resolves concurrently, and the output preserves the
    /// input order no matter which resolution finishes first.
    pub async fn hydrate_sections(
        &self,
        tenant: &str,
        sections: &[Section],
    ) -> Vec<HydratedSection> {
        let jobs = sections
            .iter()
            .filter(|section| section.is_active)
            .map(|section| async move {
                match self.resolver.resolve(tenant, section).await {
                    Ok(data) => HydratedSection::resolved(section, data),
                    Err(error) => {
                        tracing::warn!(
                            section = %section.id,
                            tenant,
                            %error,
                            "section resolution failed, serving it empty"
                        );
                        HydratedSection::failed(section)
                    }
                }
            });

        // join_all returns results in input order even though the futures
        // complete out of order
        join_all(jobs).await
    }

    /// Hydrate a full page, ordering sections by their author-assigned
    /// position first.
    pub async fn hydrate_page(&self, tenant: &str, page: &Page) -> HydratedPage {
        let mut ordered = page.sections.clone();
        ordered.sort_by_key(|section| section.position);

        HydratedPage {
            id: page.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            sections: self.hydrate_sections(tenant, &ordered).await,
        }
    }
}

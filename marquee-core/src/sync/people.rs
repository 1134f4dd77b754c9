use marquee_model::{Person, PersonId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::database::{CatalogStore, CatalogTransaction};
use crate::error::Result;
use crate::providers::MetadataSource;
use crate::sync::CatalogSync;
use crate::sync::merge::merge_person_details;
use crate::sync::outcome::{BatchReport, ItemOutcome};

enum Enrichment {
    AlreadyComplete(Person),
    Updated(Person),
    MissingUpstream(Option<Person>),
}

impl Enrichment {
    fn into_person(self) -> Option<Person> {
        match self {
            Enrichment::AlreadyComplete(person)
            | Enrichment::Updated(person) => Some(person),
            Enrichment::MissingUpstream(stored) => stored,
        }
    }
}

impl<S: CatalogStore, P: MetadataSource> CatalogSync<S, P> {
    async fn enrich(&self, person_id: PersonId) -> Result<Enrichment> {
        let stored = self.store.person(person_id).await?;
        if let Some(person) =
            stored.as_ref().filter(|person| !person.needs_enrichment())
        {
            debug!(person_id = %person_id, "person already enriched");
            return Ok(Enrichment::AlreadyComplete(person.clone()));
        }

        let Some(details) = self.source.person_details(person_id).await? else {
            debug!(person_id = %person_id, "provider has no person record");
            return Ok(Enrichment::MissingUpstream(stored));
        };

        let mut tx = self.store.begin().await?;
        let current = tx.person(person_id).await?;
        let mut person = merge_person_details(current.as_ref(), &details);
        person.id = person_id;
        tx.save_person(&person).await?;
        tx.commit().await?;

        debug!(person_id = %person_id, "person enriched");
        Ok(Enrichment::Updated(person))
    }

    /// Completes a person's profile fields from the provider. A person whose
    /// biography, birthday and place of birth are all present is returned
    /// as stored without a provider call.
    pub async fn enrich_person(
        &self,
        person_id: PersonId,
    ) -> Result<Option<Person>> {
        Ok(self.enrich(person_id).await?.into_person())
    }

    /// Enriches up to `max` people that still miss profile fields, lowest id
    /// first.
    pub async fn enrich_people(
        &self,
        max: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        if max == 0 {
            return Ok(report);
        }

        let candidates = self.store.people_needing_enrichment(max).await?;
        info!(candidates = candidates.len(), "enriching people");

        for person_id in candidates {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let outcome = match self.enrich(person_id).await {
                Ok(Enrichment::Updated(_)) => ItemOutcome::Synced,
                Ok(
                    Enrichment::AlreadyComplete(_)
                    | Enrichment::MissingUpstream(_),
                ) => ItemOutcome::Skipped,
                Err(err) => {
                    warn!(
                        person_id = %person_id,
                        error = %err,
                        "person enrichment failed"
                    );
                    ItemOutcome::Failed(err.to_string())
                }
            };
            report.record(person_id.0, outcome);
        }

        info!(
            synced = report.synced,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "people enrichment finished"
        );
        Ok(report)
    }
}

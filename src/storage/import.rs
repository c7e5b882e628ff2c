use super::categories::insert_category_feed;
use super::countries::insert_country_feed;
use super::schema::Database;
use super::types::{Category, Country, ImportDefaults, ImportError, ImportSummary, NewFeed};
use crate::feed::{CountryCodes, FeedRecord};
use crate::util::{strip_control_chars, validate_url};

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    /// At least one grouping received the feed
    Imported,
    /// Every grouping already had the feed
    Duplicate,
}

impl Database {
    // ========================================================================
    // Bulk Import
    // ========================================================================

    /// Import extracted records into the catalogue.
    ///
    /// Each record is filed under its own category and country, or under the
    /// defaults when it carries none. Records are processed in order and a
    /// failing record never aborts the batch; its message lands in
    /// [`ImportSummary::errors`]. A feed URL already present in a grouping
    /// counts as a duplicate, not a failure.
    ///
    /// # Arguments
    ///
    /// * `records` - Extracted feed records
    /// * `defaults` - Category and country applied to untagged records
    /// * `countries` - Lookup used to name countries created on the fly
    pub async fn bulk_import(
        &self,
        records: &[FeedRecord],
        defaults: &ImportDefaults,
        countries: &CountryCodes,
    ) -> ImportSummary {
        self.ensure_defaults(defaults, countries).await;

        let mut summary = ImportSummary::default();

        for record in records {
            match self.import_record(record, defaults, countries).await {
                Ok(RecordOutcome::Imported) => summary.success += 1,
                Ok(RecordOutcome::Duplicate) => {
                    tracing::debug!(url = %record.feed_url, "Feed already imported");
                    summary.duplicates += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        title = %record.title,
                        url = %record.feed_url,
                        error = %e,
                        "Failed to import feed"
                    );
                    summary.failed += 1;
                    summary
                        .errors
                        .push(format!("Failed to import {}: {}", record.title, e));
                }
            }
        }

        tracing::info!(
            total = records.len(),
            success = summary.success,
            duplicates = summary.duplicates,
            failed = summary.failed,
            "Bulk import finished"
        );

        summary
    }

    /// Make sure the default category and country exist before any record
    /// needs them. Failures are logged only; records that depend on a missing
    /// default fail individually later.
    async fn ensure_defaults(&self, defaults: &ImportDefaults, countries: &CountryCodes) {
        if let Err(e) = self.find_or_create_category(&defaults.category).await {
            tracing::warn!(
                category = %defaults.category,
                error = %e,
                "Could not create default category"
            );
        }

        let name = countries.name_for(&defaults.country_code);
        if let Err(e) = self
            .find_or_create_country(&defaults.country_code, &name)
            .await
        {
            tracing::warn!(
                code = %defaults.country_code,
                error = %e,
                "Could not create default country"
            );
        }
    }

    async fn import_record(
        &self,
        record: &FeedRecord,
        defaults: &ImportDefaults,
        countries: &CountryCodes,
    ) -> Result<RecordOutcome, ImportError> {
        validate_url(&record.feed_url).map_err(|e| ImportError::InvalidFeed {
            url: record.feed_url.clone(),
            reason: e.to_string(),
        })?;

        let title = strip_control_chars(record.title.trim()).trim().to_string();
        if title.is_empty() {
            return Err(ImportError::InvalidFeed {
                url: record.feed_url.clone(),
                reason: "empty title".to_string(),
            });
        }

        let category = self
            .resolve_category(record.category_name.as_deref(), defaults)
            .await?;
        let country = self
            .resolve_country(record.country_code.as_deref(), defaults, countries)
            .await?;

        let feed = NewFeed {
            title,
            ..NewFeed::from(record)
        };

        // Both groupings or neither: an error drops `tx`, rolling back
        let mut tx = self.pool.begin().await?;
        let outcomes = [
            insert_category_feed(&mut *tx, &category, &feed).await,
            insert_country_feed(&mut *tx, &country, &feed).await,
        ];

        let mut inserted = false;
        for outcome in outcomes {
            match outcome {
                Ok(_) => inserted = true,
                Err(e) if e.is_duplicate() => {}
                Err(e) => return Err(e),
            }
        }
        tx.commit().await?;

        Ok(if inserted {
            RecordOutcome::Imported
        } else {
            RecordOutcome::Duplicate
        })
    }

    /// The record's own category (created on demand), or the default one,
    /// which must already exist.
    async fn resolve_category(
        &self,
        name: Option<&str>,
        defaults: &ImportDefaults,
    ) -> Result<Category, ImportError> {
        let lookup_failed = |name: &str| ImportError::StorageLookupFailed {
            kind: "category",
            name: name.to_string(),
        };

        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self
                .find_or_create_category(name)
                .await
                .map_err(|_| lookup_failed(name)),
            None => self
                .find_category(&defaults.category)
                .await
                .ok()
                .flatten()
                .ok_or_else(|| lookup_failed(&defaults.category)),
        }
    }

    /// The record's own country (created on demand), or the default one,
    /// which must already exist.
    async fn resolve_country(
        &self,
        code: Option<&str>,
        defaults: &ImportDefaults,
        countries: &CountryCodes,
    ) -> Result<Country, ImportError> {
        let lookup_failed = |code: &str| ImportError::StorageLookupFailed {
            kind: "country",
            name: code.to_string(),
        };

        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => self
                .find_or_create_country(code, &countries.name_for(code))
                .await
                .map_err(|_| lookup_failed(code)),
            None => self
                .find_country(&defaults.country_code)
                .await
                .ok()
                .flatten()
                .ok_or_else(|| lookup_failed(&defaults.country_code)),
        }
    }
}

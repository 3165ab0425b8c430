//! Deterministic naming conventions
//!
//! Every generated object name is a pure function of the project code,
//! the region/jv code, the source system code and a table identifier.
//! Environment and secret values are emitted as unresolved placeholders
//! that the deployment tooling substitutes.

use serde::{Deserialize, Serialize};

use crate::record::{Direction, Periodicity};

/// Short environment name placeholder (warehouse objects)
pub const SHORT_ENV_PLACEHOLDER: &str = "{{env_var('SHORT_ENV')}}";

/// Environment placeholder used in storage URLs
pub const ENVIRONMENT_PLACEHOLDER: &str = "{{env_var('ENVIRONMENT')}}";

/// dbt target environment placeholder
pub const DBT_ENV_PLACEHOLDER: &str = "{{env_var('ENV_DBT')}}";

/// Encryption key placeholder
pub const KMS_KEY_PLACEHOLDER: &str = "{{env_var('KMS_KEY_ID')|lower}}";

/// Naming parameters of one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    /// Project code, e.g. `credit-cards`
    pub project: String,

    /// Region / joint-venture code, e.g. `INDIA`
    pub jv: String,

    /// Source system code, e.g. `EKIP`
    pub source: String,
}

impl Naming {
    /// Create naming parameters
    pub fn new(project: impl Into<String>, jv: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            jv: jv.into(),
            source: source.into(),
        }
    }

    /// Warehouse database: `DB_BNK_<JV>_{{env_var('SHORT_ENV')}}`
    pub fn database(&self) -> String {
        format!("DB_BNK_{}_{}", self.jv.to_uppercase(), SHORT_ENV_PLACEHOLDER)
    }

    /// Database as seen from dbt: `DB_BNK_<JV>_{{env_var('ENV_DBT')}}`
    pub fn dbt_database(&self) -> String {
        format!("DB_BNK_{}_{}", self.jv.to_uppercase(), DBT_ENV_PLACEHOLDER)
    }

    /// Warehouse schema: `SCH_<SOURCE>_SL`
    pub fn schema(&self) -> String {
        format!("SCH_{}_SL", self.source.to_uppercase())
    }

    /// External stage: `STG_S3_<JV>_<SOURCE>`
    pub fn stage(&self) -> String {
        format!("STG_S3_{}_{}", self.jv.to_uppercase(), self.source.to_uppercase())
    }

    /// Storage integration: `STI_S3_<JV>_{{env_var('SHORT_ENV')}}`
    pub fn storage_integration(&self) -> String {
        format!("STI_S3_{}_{}", self.jv.to_uppercase(), SHORT_ENV_PLACEHOLDER)
    }

    /// Catalog table name, e.g. `STG_CUST_INDIA_OUT_DAILY`
    pub fn catalog_table_name(&self, base_table: &str, direction: Direction, period: Periodicity) -> String {
        format!(
            "{}_{}_{}_{}",
            base_table,
            self.jv.to_uppercase(),
            direction.as_str(),
            period.as_str().to_uppercase()
        )
    }

    /// Artifact identifier of a catalog definition, e.g. `STG_CUST_DAILY_OUT`
    pub fn catalog_artifact_id(&self, base_table: &str, direction: Direction, period: Periodicity) -> String {
        format!("{}_{}_{}", base_table, period.as_str().to_uppercase(), direction.as_str())
    }

    /// Storage location of the columnar copy of a table
    pub fn standard_location(&self, base_table: &str, period: Periodicity) -> String {
        format!(
            "s3://s3b-dlz-environment-standard-{}-{}/{}/{}/{}",
            self.jv.to_lowercase(),
            self.source.to_lowercase(),
            self.project.to_lowercase(),
            period.as_str(),
            base_table.to_lowercase()
        )
    }

    /// Landing location of raw inbound files
    pub fn landing_location(&self) -> String {
        format!(
            "s3://s3b-dlz-environment-landing-{}-{}/{}/",
            self.jv.to_lowercase(),
            self.source.to_lowercase(),
            self.project.to_lowercase()
        )
    }

    /// Compiled warehouse table name derived from a catalog table name
    ///
    /// Only the `_<JV>_OUT_` segment in front of the periodicity is
    /// removed: `STG_CUST-01_INDIA_OUT_DAILY` becomes `STG_CUST_01_DAILY`.
    pub fn compiled_table_name(&self, catalog_name: &str) -> String {
        let jv_suffix = format!("_{}", self.jv.to_uppercase());
        let marker = format!("{}{}_", jv_suffix, Direction::Out.suffix());

        let stripped = match catalog_name.rfind(&marker) {
            Some(at) => format!("{}_{}", &catalog_name[..at], &catalog_name[at + marker.len()..]),
            None => {
                let name = catalog_name.strip_suffix(Direction::Out.suffix()).unwrap_or(catalog_name);
                name.strip_suffix(jv_suffix.as_str()).unwrap_or(name).to_string()
            }
        };

        to_identifier(&stripped).to_uppercase()
    }

    /// Substitute environment and region markers in a location template
    pub fn parameterize_location(&self, location: &str) -> String {
        let env = format!("-{}-", ENVIRONMENT_PLACEHOLDER);
        location
            .replace("-dev-", &env)
            .replace("-environment-", &env)
            .replace("-country-", &format!("-{}-", self.jv.to_lowercase()))
    }
}

/// Replace every character that is not ASCII alphanumeric with `_`
pub fn to_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naming() -> Naming {
        Naming::new("credit-cards", "india", "ekip")
    }

    #[test]
    fn object_names_are_templated() {
        let naming = naming();
        assert_eq!(naming.database(), "DB_BNK_INDIA_{{env_var('SHORT_ENV')}}");
        assert_eq!(naming.schema(), "SCH_EKIP_SL");
        assert_eq!(naming.stage(), "STG_S3_INDIA_EKIP");
        assert_eq!(naming.storage_integration(), "STI_S3_INDIA_{{env_var('SHORT_ENV')}}");
    }

    #[test]
    fn catalog_names() {
        let naming = naming();
        assert_eq!(
            naming.catalog_table_name("STG_CUST", Direction::Out, Periodicity::Daily),
            "STG_CUST_INDIA_OUT_DAILY"
        );
        assert_eq!(
            naming.catalog_artifact_id("STG_CUST", Direction::In, Periodicity::Weekly),
            "STG_CUST_WEEKLY_IN"
        );
        assert_eq!(
            naming.standard_location("STG_CUST", Periodicity::Monthly),
            "s3://s3b-dlz-environment-standard-india-ekip/credit-cards/monthly/stg_cust"
        );
    }

    #[test]
    fn compiled_table_name_strips_direction_and_region() {
        let naming = naming();
        assert_eq!(naming.compiled_table_name("STG_CUST-01_INDIA_OUT_DAILY"), "STG_CUST_01_DAILY");
    }

    #[test]
    fn compiled_table_name_keeps_embedded_tokens() {
        let naming = naming();
        let outlet = naming.catalog_table_name("STG_OUTLET", Direction::Out, Periodicity::Daily);
        let other = naming.catalog_table_name("STG_LET", Direction::Out, Periodicity::Daily);
        assert_eq!(naming.compiled_table_name(&outlet), "STG_OUTLET_DAILY");
        assert_eq!(naming.compiled_table_name(&other), "STG_LET_DAILY");

        let naming = Naming::new("cards", "fr", "ekip");
        let fraud = naming.catalog_table_name("STG_FRAUD", Direction::Out, Periodicity::Daily);
        assert_eq!(fraud, "STG_FRAUD_FR_OUT_DAILY");
        assert_eq!(naming.compiled_table_name(&fraud), "STG_FRAUD_DAILY");

        let fraud_out = naming.catalog_table_name("STG_FR_OUT_FRAUD", Direction::Out, Periodicity::Monthly);
        assert_eq!(naming.compiled_table_name(&fraud_out), "STG_FR_OUT_FRAUD_MONTHLY");
    }

    #[test]
    fn compiled_table_name_without_periodicity() {
        let naming = naming();
        assert_eq!(naming.compiled_table_name("STG_OUTLET_INDIA_OUT"), "STG_OUTLET");
        assert_eq!(naming.compiled_table_name("STG_OUTLET"), "STG_OUTLET");
    }

    #[test]
    fn location_placeholders() {
        let naming = naming();
        assert_eq!(
            naming.parameterize_location("s3://s3b-dlz-environment-standard-country-ekip/x"),
            "s3://s3b-dlz-{{env_var('ENVIRONMENT')}}-standard-india-ekip/x"
        );
    }
}

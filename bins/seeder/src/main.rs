//! Database seeder for CompliHR development and testing.
//!
//! Seeds demo organizations with a mix of default and custom ID patterns,
//! plus a legacy employee counter so lifetime numbering continues from an
//! imported value.
//!
//! Usage: cargo run --bin seeder

use anyhow::{Context, bail};
use complihr_core::sequencing::{IdCategory, IdSequencer};
use complihr_db::{
    CreateOrganizationInput, OrganizationRepository, OrganizationSettingsRepository,
    entities::organizations,
};
use sea_orm::DatabaseConnection;

struct DemoOrganization {
    name: &'static str,
    code: &'static str,
    timezone: &'static str,
    patterns: &'static [(IdCategory, &'static str)],
    legacy_counters: &'static [(IdCategory, i64)],
}

const DEMO_ORGANIZATIONS: &[DemoOrganization] = &[
    DemoOrganization {
        name: "Acme Care Services",
        code: "ACM",
        timezone: "Europe/London",
        patterns: &[],
        legacy_counters: &[(IdCategory::Employee, 120)],
    },
    DemoOrganization {
        name: "Northwind Health",
        code: "NWH",
        timezone: "America/New_York",
        patterns: &[
            (IdCategory::Employee, "NW{SEQUENCE:6}"),
            (IdCategory::Payroll, "{ORG}/{YEAR}/{MONTH}/{SEQUENCE:3}"),
        ],
        legacy_counters: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = complihr_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    for demo in DEMO_ORGANIZATIONS {
        println!("Seeding organization {}...", demo.code);
        seed_organization(&db, demo).await?;
    }

    println!("Seeding complete!");
    Ok(())
}

async fn seed_organization(
    db: &DatabaseConnection,
    demo: &DemoOrganization,
) -> anyhow::Result<()> {
    let org_repo = OrganizationRepository::new(db.clone());
    let settings_repo = OrganizationSettingsRepository::new(db.clone());

    let existing = org_repo.find_by_code(demo.code).await?;
    let org: organizations::Model = if let Some(existing) = existing {
        println!("  {} already exists, skipping creation...", demo.code);
        existing
    } else {
        org_repo
            .create(CreateOrganizationInput {
                name: demo.name.to_string(),
                code: demo.code.to_string(),
                timezone: demo.timezone.to_string(),
            })
            .await?
    };

    for (category, pattern) in demo.patterns {
        let pattern = IdSequencer::validate_pattern(pattern)?;
        if !settings_repo
            .update_pattern(org.id, *category, Some(pattern.as_str().to_string()))
            .await?
        {
            bail!("organization {} disappeared while seeding", demo.code);
        }
        println!("  {category} pattern: {pattern}");
    }

    for (category, value) in demo.legacy_counters {
        settings_repo
            .update_legacy_counter(org.id, *category, *value)
            .await?;
        println!("  {category} legacy counter: {value}");
    }

    Ok(())
}

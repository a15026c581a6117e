//! Initial database migration.
//!
//! Creates organizations and their settings, including the per-category
//! pattern columns and the legacy counters that seed lifetime sequences.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(UPDATED_AT_FUNCTION_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(ORGANIZATION_SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const UPDATED_AT_FUNCTION_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    code VARCHAR(10) NOT NULL UNIQUE,
    timezone VARCHAR(50) NOT NULL DEFAULT 'Europe/London',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_organization_code CHECK (code ~ '^[A-Z0-9]{2,10}$')
);

CREATE TRIGGER trg_organizations_updated_at
BEFORE UPDATE ON organizations
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();
";

const ORGANIZATION_SETTINGS_SQL: &str = r"
-- NULL pattern columns mean the built-in default applies.
CREATE TABLE organization_settings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL UNIQUE REFERENCES organizations(id) ON DELETE CASCADE,

    employee_id_pattern VARCHAR(100),
    payroll_id_pattern VARCHAR(100),
    leave_id_pattern VARCHAR(100),
    expense_id_pattern VARCHAR(100),
    shift_id_pattern VARCHAR(100),
    department_code_pattern VARCHAR(100),

    employee_counter BIGINT NOT NULL DEFAULT 0,
    payroll_counter BIGINT NOT NULL DEFAULT 0,
    leave_counter BIGINT NOT NULL DEFAULT 0,
    expense_counter BIGINT NOT NULL DEFAULT 0,
    shift_counter BIGINT NOT NULL DEFAULT 0,
    department_code_counter BIGINT NOT NULL DEFAULT 0,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_legacy_counters_non_negative CHECK (
        employee_counter >= 0 AND payroll_counter >= 0 AND leave_counter >= 0
        AND expense_counter >= 0 AND shift_counter >= 0 AND department_code_counter >= 0
    )
);

CREATE TRIGGER trg_organization_settings_updated_at
BEFORE UPDATE ON organization_settings
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS organization_settings CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
DROP FUNCTION IF EXISTS set_updated_at();
";

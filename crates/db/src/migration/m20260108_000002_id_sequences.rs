//! Sequence counters for generated identifiers.
//!
//! One row per (organization, category, year, month). `year = 0` and
//! `month = 0` mark scopes that never reset on that component, so the unique
//! key can back `ON CONFLICT` without NULLs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ID_SEQUENCES_SQL).await?;
        db.execute_unprepared(NEXT_VALUE_FUNCTION_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP FUNCTION IF EXISTS next_id_sequence_value(UUID, TEXT, INT, SMALLINT);
            DROP TABLE IF EXISTS id_sequences CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const ID_SEQUENCES_SQL: &str = r"
CREATE TABLE id_sequences (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    sequence_type VARCHAR(32) NOT NULL,
    year INT NOT NULL DEFAULT 0,
    month SMALLINT NOT NULL DEFAULT 0,
    current_value BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_id_sequences_scope UNIQUE (organization_id, sequence_type, year, month),
    CONSTRAINT chk_id_sequences_type CHECK (
        sequence_type IN ('employee', 'payroll', 'leave', 'expense', 'shift', 'department-code')
    ),
    CONSTRAINT chk_id_sequences_year CHECK (year >= 0),
    CONSTRAINT chk_id_sequences_month CHECK (month BETWEEN 0 AND 12),
    CONSTRAINT chk_id_sequences_value CHECK (current_value >= 1)
);

CREATE TRIGGER trg_id_sequences_updated_at
BEFORE UPDATE ON id_sequences
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();
";

const NEXT_VALUE_FUNCTION_SQL: &str = r"
-- ============================================================
-- FUNCTION: next_id_sequence_value
-- Increments (creating on first use) one counter and returns the new value.
-- Lifetime scopes start from the legacy organization_settings counter.
-- ============================================================
CREATE OR REPLACE FUNCTION next_id_sequence_value(
    p_organization_id UUID,
    p_sequence_type TEXT,
    p_year INT,
    p_month SMALLINT
) RETURNS BIGINT AS $$
DECLARE
    seed BIGINT := 0;
    issued BIGINT;
BEGIN
    IF p_year = 0 AND p_month = 0 THEN
        SELECT CASE p_sequence_type
                   WHEN 'employee' THEN s.employee_counter
                   WHEN 'payroll' THEN s.payroll_counter
                   WHEN 'leave' THEN s.leave_counter
                   WHEN 'expense' THEN s.expense_counter
                   WHEN 'shift' THEN s.shift_counter
                   WHEN 'department-code' THEN s.department_code_counter
                   ELSE 0
               END
        INTO seed
        FROM organization_settings s
        WHERE s.organization_id = p_organization_id;

        seed := COALESCE(seed, 0);
    END IF;

    INSERT INTO id_sequences (organization_id, sequence_type, year, month, current_value)
    VALUES (p_organization_id, p_sequence_type, p_year, p_month, seed + 1)
    ON CONFLICT (organization_id, sequence_type, year, month)
    DO UPDATE SET
        current_value = id_sequences.current_value + 1,
        updated_at = now()
    RETURNING id_sequences.current_value INTO issued;

    RETURN issued;
END;
$$ LANGUAGE plpgsql;
";

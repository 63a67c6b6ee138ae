//! Arrow table for the comprehensive requirement report.
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::category::category_of;
use crate::error::CoreError;
use crate::model::Requirement;

/// One row per requirement, in input order.
pub fn requirement_report_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("policy", DataType::Utf8, false),
        Field::new("actor", DataType::Utf8, false),
        Field::new("requirement", DataType::Utf8, false),
        Field::new("deadline", DataType::Utf8, true),
        Field::new("penalty", DataType::Utf8, true),
        Field::new("risk_level", DataType::Utf8, false),
        Field::new("control_count", DataType::UInt32, false),
    ])
}

/// Build the report batch from a flat requirement list.
pub fn requirement_report(reqs: &[Requirement]) -> Result<RecordBatch, CoreError> {
    let utf8 = |f: fn(&Requirement) -> &str| -> ArrayRef {
        Arc::new(reqs.iter().map(f).map(Some).collect::<StringArray>())
    };

    let columns: Vec<ArrayRef> = vec![
        utf8(|r| r.id.as_str()),
        utf8(category_of),
        utf8(|r| r.policy.as_str()),
        utf8(|r| r.actor.as_str()),
        utf8(|r| r.requirement.as_str()),
        Arc::new(
            reqs.iter()
                .map(|r| r.deadline.as_deref())
                .collect::<StringArray>(),
        ),
        Arc::new(
            reqs.iter()
                .map(|r| r.penalty.as_deref())
                .collect::<StringArray>(),
        ),
        utf8(|r| r.risk_level().as_str()),
        Arc::new(
            reqs.iter()
                .map(|r| r.mapped_controls.len() as u32)
                .collect::<UInt32Array>(),
        ),
    ];

    Ok(RecordBatch::try_new(
        Arc::new(requirement_report_schema()),
        columns,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MappedControl;
    use arrow::array::Array;

    #[test]
    fn report_schema_has_expected_fields() {
        let schema = requirement_report_schema();
        assert_eq!(schema.fields().len(), 9);
        assert!(schema.field_with_name("risk_level").is_ok());
        assert!(schema.field_with_name("deadline").unwrap().is_nullable());
    }

    #[test]
    fn report_rows_follow_input() {
        let reqs = vec![
            Requirement {
                id: "req_1".into(),
                policy: "SOX 404".into(),
                penalty: Some("Criminal penalties".into()),
                mapped_controls: vec![MappedControl::default(), MappedControl::default()],
                ..Default::default()
            },
            Requirement {
                id: "req_2".into(),
                deadline: Some("30 days".into()),
                ..Default::default()
            },
        ];
        let batch = requirement_report(&reqs).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let category = batch
            .column_by_name("category")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(category.value(0), "SOX 404");
        assert_eq!(category.value(1), "General Compliance");

        let risk = batch
            .column_by_name("risk_level")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(risk.value(0), "high");
        assert_eq!(risk.value(1), "medium");

        let penalty = batch.column_by_name("penalty").unwrap();
        assert!(penalty.is_null(1));

        let controls = batch
            .column_by_name("control_count")
            .unwrap()
            .as_any()
            .downcast_ref::<UInt32Array>()
            .unwrap();
        assert_eq!(controls.value(0), 2);
    }

    #[test]
    fn empty_report() {
        let batch = requirement_report(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 9);
    }
}

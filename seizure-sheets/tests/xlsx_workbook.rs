#![cfg(feature = "xlsx")]

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use seizure_core::{DashboardConfig, DateDomain, KpiPanel, Metric, MetricValue};
use seizure_sheets::{map_workbook, read_xlsx, summarize_raw};

// Excel serial days (1900 date system).
const JAN_1_2024: f64 = 45292.0;
const JAN_20_2024: f64 = 45311.0;
const FEB_1_2024: f64 = 45323.0;

fn header(sheet: &mut Worksheet, names: &[&str]) {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
}

fn clinic_workbook() -> Vec<u8> {
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Patient Data").unwrap();
        header(
            sheet,
            &[
                "Patient_ID",
                "ConsultationDate",
                "SeizureCount",
                "AvgDuration(min)",
                "MedicationAdherence(%)",
                "SUDEP_RiskScore",
            ],
        );
        let rows: [(f64, Option<f64>, f64, f64, f64, f64); 3] = [
            (47598.0, Some(JAN_1_2024), 5.0, 3.5, 85.0, 6.0),
            (47597.0, Some(JAN_20_2024), 8.0, 4.0, 70.0, 7.0),
            (47598.0, Some(FEB_1_2024), 3.0, 3.0, 88.5, 5.0),
        ];
        for (index, (id, day, seizures, duration, adherence, risk)) in rows.iter().enumerate() {
            let row = index as u32 + 1;
            sheet.write_number(row, 0, *id).unwrap();
            if let Some(day) = day {
                sheet.write_number_with_format(row, 1, *day, &date).unwrap();
            }
            sheet.write_number(row, 2, *seizures).unwrap();
            sheet.write_number(row, 3, *duration).unwrap();
            sheet.write_number(row, 4, *adherence).unwrap();
            sheet.write_number(row, 5, *risk).unwrap();
        }
        // Text date next to the date-formatted serials.
        sheet.write_string(4, 0, "47598").unwrap();
        sheet.write_string(4, 1, "2024-03-01").unwrap();
        sheet.write_number(4, 2, 4.0).unwrap();
        sheet.write_number(4, 3, 3.25).unwrap();
        sheet.write_number(4, 4, 92.0).unwrap();
        sheet.write_number(4, 5, 5.0).unwrap();
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Type Distribution").unwrap();
        header(sheet, &["Patient_ID", "SeizureType", "Count"]);
        sheet.write_number(1, 0, 47598.0).unwrap();
        sheet.write_string(1, 1, "Focal").unwrap();
        sheet.write_number(1, 2, 4.0).unwrap();
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Side Effects").unwrap();
        header(sheet, &["Patient_ID", "SideEffect", "Count"]);
        // Side effect cell left blank.
        sheet.write_number(1, 0, 47598.0).unwrap();
        sheet.write_number(1, 2, 7.0).unwrap();
    }

    workbook.save_to_buffer().expect("workbook serialization failed")
}

#[test]
fn xlsx_sheets_map_by_header() {
    let raw = read_xlsx(&clinic_workbook()).expect("xlsx decode failed");
    let tables = map_workbook(&raw).expect("mapping failed");

    assert_eq!(tables.patient_records.len(), 4);
    assert_eq!(tables.patient_records[0].patient_id, "47598");
    assert_eq!(tables.patient_records[1].patient_id, "47597");
    assert_eq!(tables.seizure_types[0].seizure_type, "Focal");
    assert_eq!(tables.side_effects[0].side_effect, None);
}

#[test]
fn xlsx_snapshot_compares_latest_two_consultations() {
    let raw = read_xlsx(&clinic_workbook()).expect("xlsx decode failed");
    let snapshot = summarize_raw(&raw, Some("47598"), &DashboardConfig::default())
        .expect("snapshot failed");

    assert_eq!(snapshot.record_count, 3);
    let tile = snapshot.kpis.tile(Metric::SeizureCount).expect("seizure tile");
    assert_eq!(tile.value, MetricValue::Integer(4));
    assert_eq!(tile.delta, MetricValue::Integer(1));
    assert!(matches!(snapshot.kpis, KpiPanel::Ready { .. }));

    let domain = snapshot.date_domain.expect("date domain");
    assert_eq!(
        domain,
        DateDomain {
            min: "2024-01-01".parse().unwrap(),
            max: "2024-03-01".parse().unwrap(),
        }
    );
    assert_eq!(snapshot.side_effects.len(), 1);
    assert_eq!(snapshot.side_effects[0].label, "None");
    assert_eq!(snapshot.side_effects[0].count, 7);
}

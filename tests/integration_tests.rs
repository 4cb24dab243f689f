use anyhow::Result;
use placement_matcher::{CliConfig, LocalStorage, MatchRunner, MatchSettings, RosterPipeline};
use tempfile::TempDir;

const SITES_CSV: &str = "\
id,name,type,distance,capacity
H1,Mercy Hospital,Hospital,12,1
C1,Eastside Clinic,Clinic,10,2
C2,City Clinic,Clinic,3,1
C3,Westside Clinic,Clinic,7,1
";

const STUDENTS_CSV: &str = "\
Student ID,Student Name,Workplace_2_TEXT,Travel_capacity,Preference,Constraints_2_TEXT
1001,Ana Ruiz,,I can drive 10-15 miles,Hospital,
1002,Ben Cho,City Clinic,I need a site within Iowa City,Clinic,
,Blank Row,,20-30 miles,,
1003,Cara Diaz,,20-30 miles,Clinic,Evenings only
1004,Dev Shah,,No transportation available,,
1005,Eli Park,,maybe,,
";

fn write_inputs(dir: &TempDir) -> Result<(String, String)> {
    let sites = dir.path().join("sites.csv");
    let students = dir.path().join("students.csv");
    std::fs::write(&sites, SITES_CSV)?;
    std::fs::write(&students, STUDENTS_CSV)?;
    Ok((
        sites.to_str().unwrap().to_string(),
        students.to_str().unwrap().to_string(),
    ))
}

#[tokio::test]
async fn test_end_to_end_matching_writes_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (sites, students) = write_inputs(&temp_dir)?;
    let output_dir = temp_dir.path().join("output");
    let output_path = output_dir.to_str().unwrap().to_string();

    let config = CliConfig::new(sites, students, output_path.clone());
    let pipeline = RosterPipeline::new(
        LocalStorage::current_dir(),
        LocalStorage::new(output_path.clone()),
        config,
        MatchSettings::default(),
    )?;

    let result = MatchRunner::new(pipeline).run().await?;

    assert_eq!(result.assigned, 3);
    assert_eq!(result.unassigned, 1);
    assert_eq!(result.rejected_rows, 2);

    let written = result.output_path.expect("run should report its output file");
    assert!(std::path::Path::new(&written).exists());

    let mut reader = csv::Reader::from_path(&written)?;
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "id",
            "name",
            "assigned_site_id",
            "assigned_site_name",
            "assigned_site_type",
            "reason"
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    let placed: Vec<(&str, &str)> = rows.iter().map(|r| (&r[0], &r[2])).collect();
    // 交通距離小的先處理
    assert_eq!(
        placed,
        vec![("1004", ""), ("1002", "C3"), ("1001", "H1"), ("1003", "C2")]
    );

    // 1002 works at City Clinic, so the nearer C2 is skipped even though it is in range
    assert!(!rows[1][5].contains("WARNING"));
    assert!(rows[1][5].contains("Matches preferred setting type: Clinic."));
    assert!(rows[2][5].contains("Matches preferred setting type: Hospital."));
    assert_eq!(
        &rows[0][5],
        "No feasible site found within travel capacity and capacity constraints."
    );

    assert!(result
        .summary_lines
        .contains(&"Site Eastside Clinic (C1): 2 spots left".to_string()));
    assert!(result
        .summary_lines
        .contains(&"Site City Clinic (C2): 0 spots left".to_string()));
    assert!(result
        .summary_lines
        .contains(&"Dev Shah (ID: 1004)".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_settings_file_changes_no_transportation_policy() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (sites, students) = write_inputs(&temp_dir)?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let settings_path = temp_dir.path().join("match.toml");
    std::fs::write(
        &settings_path,
        r#"
[travel]
no_transportation_miles = 3

[output]
filename_prefix = "spring"
write_unassigned = true
write_summary_json = true
"#,
    )?;
    let settings = MatchSettings::from_file(&settings_path)?;

    let config = CliConfig::new(sites, students, output_path.clone());
    let pipeline = RosterPipeline::new(
        LocalStorage::current_dir(),
        LocalStorage::new(output_path.clone()),
        config,
        settings,
    )?;

    let result = MatchRunner::new(pipeline).run().await?;

    // With 3 miles, Dev can reach City Clinic (distance 3)
    assert_eq!(result.assigned, 4);
    assert_eq!(result.unassigned, 0);

    let mut names: Vec<String> = std::fs::read_dir(&output_path)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();

    // 沒有未分配學生時不寫 unassigned 檔
    assert_eq!(names.len(), 2);
    assert!(names[0].starts_with("spring-") && names[0].ends_with(".csv"));
    assert!(names[1].starts_with("spring-") && names[1].ends_with(".json"));

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("out").join(&names[1]))?)?;
    assert_eq!(summary["assigned"], 4);
    assert_eq!(summary["rejected_rows"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (sites, students) = write_inputs(&temp_dir)?;
    let output_dir = temp_dir.path().join("never");
    let output_path = output_dir.to_str().unwrap().to_string();

    let config = CliConfig::new(sites, students, output_path.clone());
    let pipeline = RosterPipeline::new(
        LocalStorage::current_dir(),
        LocalStorage::new(output_path),
        config,
        MatchSettings::default(),
    )?;

    let result = MatchRunner::new(pipeline).dry_run().await?;

    assert!(result.output_path.is_none());
    assert_eq!(result.assigned, 3);
    assert!(!output_dir.exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_student_column_fails_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let sites = temp_dir.path().join("sites.csv");
    let students = temp_dir.path().join("students.csv");
    std::fs::write(&sites, SITES_CSV)?;
    std::fs::write(&students, "Student ID,Student Name\n1,Ann\n")?;
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = CliConfig::new(
        sites.to_str().unwrap(),
        students.to_str().unwrap(),
        output_path.clone(),
    );
    let pipeline = RosterPipeline::new(
        LocalStorage::current_dir(),
        LocalStorage::new(output_path),
        config,
        MatchSettings::default(),
    )?;

    let err = MatchRunner::new(pipeline).run().await.unwrap_err();
    assert!(err.to_string().contains("Travel_capacity"));
    Ok(())
}

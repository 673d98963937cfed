mod helpers;

use aomigo::assistant::mock::MockAssistant;
use aomigo::assistant::AssistantProvider;
use aomigo::learning::profile::require_profile;
use aomigo::learning::reviews::list_open;
use aomigo::learning::sessions::update_answer;
use aomigo::learning::topics;
use chrono::{DateTime, Duration, Utc};
use helpers::{fixed_now, seed_profile, teach, test_db};

#[test]
fn teach_answer_loop_feeds_the_pet() {
    let mut conn = test_db();
    let now = fixed_now();
    seed_profile(&conn, "u1");

    // Teach: the lesson's topics get bootstrap reviews ten minutes out
    let session = teach(
        &mut conn,
        "u1",
        "The moon's gravity pulls the oceans and creates tides",
        &["tides", "gravity"],
        now,
    );

    let open = list_open(&conn, "u1").unwrap();
    assert_eq!(open.len(), 2);
    for review in &open {
        let scheduled: DateTime<Utc> = review.scheduled_date.parse().unwrap();
        assert_eq!(scheduled - now, Duration::minutes(10));
    }

    // Answer: the mock scores deterministically, rewards hit the profile
    let evaluation = MockAssistant
        .evaluate_answer(
            session.follow_up_question.as_deref().unwrap_or_default(),
            "High tide happens on the side facing the moon because gravity pulls the water into a bulge",
        )
        .unwrap();

    let (updated, rewards) = update_answer(
        &mut conn,
        "u1",
        &session.session_id,
        "High tide happens on the side facing the moon because gravity pulls the water into a bulge",
        evaluation.quality_score,
        now,
    )
    .unwrap();

    assert_eq!(updated.quality_score, Some(evaluation.quality_score));
    assert_eq!(rewards.intelligence_gain, evaluation.quality_score / 10);

    let profile = require_profile(&conn, "u1").unwrap();
    assert_eq!(profile.intelligence, rewards.intelligence_gain);
    assert_eq!(profile.health, 80 + rewards.health_change);
}

#[test]
fn reteaching_builds_depth_not_duplicates() {
    let mut conn = test_db();
    let now = fixed_now();
    seed_profile(&conn, "u1");

    teach(&mut conn, "u1", "Tides come from the moon", &["tides"], now);
    teach(
        &mut conn,
        "u1",
        "Tides also respond to the sun",
        &["tides", "solar gravity"],
        now + Duration::hours(1),
    );

    let all = topics::list_for_user(&conn, "u1", None).unwrap();
    assert_eq!(all.len(), 2);

    let tides = all.iter().find(|t| t.topic_name == "tides").unwrap();
    assert_eq!(tides.depth, 2);
    let solar = all.iter().find(|t| t.topic_name == "solar gravity").unwrap();
    assert_eq!(solar.depth, 1);

    // Each teach call scheduled a fresh bootstrap review
    assert_eq!(list_open(&conn, "u1").unwrap().len(), 3);
}

#[test]
fn full_loop_with_mock_extraction() {
    let mut conn = test_db();
    let now = fixed_now();
    seed_profile(&conn, "u1");

    // Drive the same pipeline the teach endpoint runs: extract, question, record
    let raw_input = "Photosynthesis converts sunlight into chemical energy inside chloroplasts";
    let extracted = MockAssistant.extract_topics(raw_input).unwrap();
    assert!(!extracted.is_empty());

    let question = MockAssistant
        .follow_up_question(raw_input, &extracted, &[])
        .unwrap();
    assert!(question.contains(&extracted[0]));

    let topic_refs: Vec<&str> = extracted.iter().map(String::as_str).collect();
    teach(&mut conn, "u1", raw_input, &topic_refs, now);

    let stored = topics::list_for_user(&conn, "u1", None).unwrap();
    assert_eq!(stored.len(), extracted.len());
}

#[test]
fn activity_log_records_the_whole_flow() {
    let mut conn = test_db();
    let now = fixed_now();
    seed_profile(&conn, "u1");

    let session = teach(&mut conn, "u1", "Sound is a pressure wave", &["acoustics"], now);
    update_answer(&mut conn, "u1", &session.session_id, "It vibrates!", 80, now).unwrap();

    let operations: Vec<String> = conn
        .prepare("SELECT operation FROM activity_log WHERE user_id = 'u1' ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert!(operations.contains(&"teach".to_string()));
    assert!(operations.contains(&"review_scheduled".to_string()));
    assert!(operations.contains(&"answer".to_string()));
}

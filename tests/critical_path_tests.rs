use task_planner::{CpmResult, Durations, GraphContext, Planner, TaskRecord};

fn analyze(context: &GraphContext) -> CpmResult {
    let planner = Planner::new(context);
    let acyclic = planner.acyclic(&planner.detect_cycles()).unwrap();
    let order = planner.order(acyclic).unwrap();
    planner.critical_path(acyclic, &order).unwrap()
}

fn diamond() -> GraphContext {
    GraphContext::new(vec![
        TaskRecord::new(1, "A").with_hours(2.0),
        TaskRecord::new(2, "B").depending_on([1]).with_hours(5.0),
        TaskRecord::new(3, "C").depending_on([1]).with_hours(1.0),
        TaskRecord::new(4, "D").depending_on([2, 3]).with_hours(1.0),
    ])
    .unwrap()
}

#[test]
fn single_chain_is_fully_critical() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "A").with_hours(2.0),
        TaskRecord::new(2, "B").depending_on([1]).with_hours(3.0),
        TaskRecord::new(3, "C").depending_on([2]).with_hours(1.0),
    ])
    .unwrap();
    let result = analyze(&context);

    let times: Vec<(f64, f64)> = [1, 2, 3]
        .iter()
        .map(|&id| {
            let node = result.node(id).unwrap();
            (node.earliest_start, node.earliest_finish)
        })
        .collect();
    assert_eq!(times, vec![(0.0, 2.0), (2.0, 5.0), (5.0, 6.0)]);
    assert!(result.nodes.iter().all(|n| n.slack == 0.0 && n.is_critical));
    assert_eq!(result.project_duration, 6.0);
    assert_eq!(result.critical_path, vec![1, 2, 3]);
}

#[test]
fn shorter_diamond_branch_has_slack() {
    let result = analyze(&diamond());

    let b = result.node(2).unwrap();
    let c = result.node(3).unwrap();
    assert!(b.is_critical);
    assert_eq!(b.slack, 0.0);
    assert!(!c.is_critical);
    assert_eq!(c.slack, 4.0);
    assert_eq!(c.latest_start, 6.0);
    assert_eq!(c.latest_finish, 7.0);

    assert_eq!(result.project_duration, 8.0);
    assert_eq!(result.critical_path, vec![1, 2, 4]);
    assert_eq!(result.critical_ids(), vec![1, 2, 4]);
    assert_eq!(result.critical_count, 3);
}

#[test]
fn parallel_independent_chains_only_longest_is_critical() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "short").with_hours(1.0),
        TaskRecord::new(2, "long").with_hours(5.0),
        TaskRecord::new(3, "after long").depending_on([2]).with_hours(1.0),
    ])
    .unwrap();
    let result = analyze(&context);

    assert_eq!(result.node(1).unwrap().slack, 5.0);
    assert_eq!(result.critical_path, vec![2, 3]);
}

#[test]
fn lone_task_is_its_own_critical_path() {
    let context = GraphContext::new(vec![TaskRecord::new(1, "only").with_hours(3.0)]).unwrap();
    let result = analyze(&context);

    let only = result.node(1).unwrap();
    assert_eq!((only.earliest_start, only.latest_start), (0.0, 0.0));
    assert_eq!(only.latest_finish, 3.0);
    assert_eq!(only.slack, 0.0);
    assert!(only.is_critical);
    assert_eq!(result.critical_path, vec![1]);
    assert_eq!(result.project_duration, 3.0);
}

#[test]
fn isolated_task_beside_a_longer_chain_starts_at_zero_with_slack() {
    let context = GraphContext::new(vec![
        TaskRecord::new(1, "A").with_hours(2.0),
        TaskRecord::new(2, "B").depending_on([1]).with_hours(4.0),
        TaskRecord::new(3, "loner").with_hours(1.0),
        TaskRecord::new(4, "twin").with_hours(6.0),
    ])
    .unwrap();
    let result = analyze(&context);

    let loner = result.node(3).unwrap();
    assert_eq!(loner.earliest_start, 0.0);
    assert_eq!((loner.latest_start, loner.latest_finish), (5.0, 6.0));
    assert_eq!(loner.slack, 5.0);
    assert!(!loner.is_critical);

    // as long as the chain, so it has no slack
    let twin = result.node(4).unwrap();
    assert_eq!((twin.earliest_start, twin.latest_start), (0.0, 0.0));
    assert!(twin.is_critical);

    assert_eq!(result.critical_path, vec![1, 2]);
    assert_eq!(result.critical_ids(), vec![1, 2, 4]);
}

#[test]
fn scenarios_are_analyzed_independently_in_order() {
    let context = diamond();
    let planner = Planner::new(&context);
    let acyclic = planner.acyclic(&planner.detect_cycles()).unwrap();
    let order = planner.order(acyclic).unwrap();

    let swap: Durations = [(2, 1.0), (3, 6.0)].into_iter().collect();
    let faster: Durations = [(2, 3.0)].into_iter().collect();
    let results = planner
        .scenarios(acyclic, &order, &[swap, faster, Durations::default()])
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].critical_path, vec![1, 3, 4]);
    assert_eq!(results[0].project_duration, 9.0);
    assert_eq!(results[1].project_duration, 6.0);
    assert_eq!(results[1].node(3).unwrap().slack, 2.0);
    assert_eq!(results[2], analyze(&context));
}

#[test]
fn cpm_json_uses_camel_case_fields() {
    let result = analyze(&diamond());
    let json = serde_json::to_value(&result).unwrap();
    let first = &json["nodes"][0];

    assert_eq!(first["id"], 1);
    assert_eq!(first["title"], "A");
    assert_eq!(first["earliestFinish"], 2.0);
    assert_eq!(first["isCritical"], true);
    assert_eq!(json["critical_path"], serde_json::json!([1, 2, 4]));
}

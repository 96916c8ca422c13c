// tests/group_ordering.rs

mod common;

use cmdgroup::group::CancelToken;
use common::{CommandSpecBuilder, TestResult, captured_group, init_tracing, with_timeout};

#[tokio::test]
async fn dependencies_finish_before_dependents_start() -> TestResult {
    init_tracing();
    let (group, out) = captured_group([
        CommandSpecBuilder::new("c", "echo C").depends_on("b").depends_on("a").build(),
        CommandSpecBuilder::new("b", "echo B").depends_on("a").build(),
        CommandSpecBuilder::new("a", "sleep 0.1; echo A").build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(out.contents(), "a | A\nb | B\nc | C\n");
    Ok(())
}

#[tokio::test]
async fn order_follows_the_graph_not_insertion() -> TestResult {
    init_tracing();
    let (group, out) = captured_group([
        CommandSpecBuilder::new("first", "echo 1").depends_on("second").build(),
        CommandSpecBuilder::new("second", "echo 2").depends_on("third").build(),
        CommandSpecBuilder::new("third", "echo 3").build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(out.contents(), "third | 3\nsecond | 2\nfirst | 1\n");
    Ok(())
}

#[tokio::test]
async fn silent_dependency_still_unblocks() -> TestResult {
    init_tracing();
    let (group, out) = captured_group([
        CommandSpecBuilder::new("a", "echo a").build(),
        CommandSpecBuilder::new("b", "echo b").silent().depends_on("a").build(),
        CommandSpecBuilder::new("c", "echo c").depends_on("b").build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(out.contents(), "a | a\nc | c\n");
    Ok(())
}

#[tokio::test]
async fn ready_pattern_unblocks_dependents_early() -> TestResult {
    init_tracing();
    let (group, out) = captured_group([
        CommandSpecBuilder::new("first", "echo monkeypotato; sleep 1; echo finally")
            .ready_pattern("potato")
            .build(),
        CommandSpecBuilder::new("second", "echo next").depends_on("first").build(),
        CommandSpecBuilder::new("last", "echo last").depends_on("second").build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(
        out.contents(),
        "first | monkeypotato\nsecond | next\nlast | last\nfirst | finally\n"
    );
    Ok(())
}

#[tokio::test]
async fn commands_share_a_working_directory_in_order() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let dir_str = dir.path().to_str().ok_or("non-utf8 temp path")?;

    let (group, out) = captured_group([
        CommandSpecBuilder::new("write", "echo written > data.txt")
            .directory(dir_str)
            .build(),
        CommandSpecBuilder::new("read", "cat data.txt")
            .directory(dir_str)
            .depends_on("write")
            .build(),
        CommandSpecBuilder::new("rm", "rm data.txt")
            .directory(dir_str)
            .depends_on("read")
            .build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(out.contents(), "read | written\n");
    assert!(!dir.path().join("data.txt").exists());
    Ok(())
}

#[tokio::test]
async fn anonymous_commands_run_without_a_prefix() -> TestResult {
    init_tracing();
    let (group, out) = captured_group([
        CommandSpecBuilder::anonymous("printf 'no newline'").build(),
        CommandSpecBuilder::anonymous("true").build(),
    ]);

    with_timeout(group.run(&CancelToken::new())).await?;

    assert_eq!(out.contents(), "no newline");
    Ok(())
}

#[tokio::test]
async fn independent_commands_all_run() -> TestResult {
    init_tracing();
    let (group, out) = captured_group(
        (0..5).map(|i| CommandSpecBuilder::new(&format!("n{i}"), &format!("echo {i}")).build()),
    );

    with_timeout(group.run(&CancelToken::new())).await?;

    let contents = out.contents();
    let mut lines: Vec<&str> = contents.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["n0 | 0", "n1 | 1", "n2 | 2", "n3 | 3", "n4 | 4"]);
    Ok(())
}

use spooler_rs::{spawn_printer_task, Printer, PrinterError, SharedPrinter};

fn batch(owner: usize, count: usize) -> Vec<(usize, usize)> {
    (0..count).map(|seq| (owner, seq)).collect()
}

/// Each submitter's pages must come out in its own submission order.
fn assert_per_owner_order(printed: &[(usize, usize)], owners: usize) {
    for owner in 0..owners {
        let seqs: Vec<usize> = printed.iter().filter(|(o, _)| *o == owner).map(|(_, s)| *s).collect();
        let mut sorted = seqs.clone();
        sorted.sort_unstable();
        assert_eq!(seqs, sorted, "pages of submitter {} out of order", owner);
    }
}

#[tokio::test]
async fn test_channel_scenario() {
    let (handle, task) = spawn_printer_task(Printer::new(3), 8);
    let printed = handle.print(vec!["a", "b", "c", "d", "e"]).await.unwrap();
    assert_eq!(printed, vec!["a", "b", "c"]);
    assert!(!handle.has_ink().await.unwrap());
    handle.refill(3).await.unwrap();
    assert_eq!(handle.print(vec!["f", "g"]).await.unwrap(), vec!["d", "e", "f"]);
    assert_eq!(handle.status().await.unwrap().queued, 1);
    assert_eq!(handle.clear().await.unwrap(), vec!["g"]);

    drop(handle);
    let printer = task.await.unwrap();
    assert_eq!(printer.pages_printed(), 6);
    assert_eq!(printer.queued(), 0);
}

#[tokio::test]
async fn test_concurrent_submitters_through_channel() {
    let (handle, task) = spawn_printer_task(Printer::new(25), 4);
    let mut joins = Vec::new();
    for owner in 0..4 {
        let handle = handle.clone();
        joins.push(tokio::spawn(async move { handle.print(batch(owner, 10)).await }));
    }
    let mut printed = Vec::new();
    for join in joins {
        let pages = join.await.unwrap().unwrap();
        assert_per_owner_order(&pages, 4);
        printed.extend(pages);
    }
    assert_eq!(printed.len(), 25);
    assert_per_owner_order(&printed, 4);

    let backlog = handle.clear().await.unwrap();
    assert_eq!(backlog.len(), 15);
    assert_per_owner_order(&backlog, 4);

    // Every page was either printed or left in the backlog, exactly once.
    let mut all: Vec<_> = printed.into_iter().chain(backlog).collect();
    all.sort_unstable();
    let mut expected: Vec<_> = (0..4).flat_map(|o| batch(o, 10)).collect();
    expected.sort_unstable();
    assert_eq!(all, expected);

    drop(handle);
    let printer = task.await.unwrap();
    assert_eq!(printer.ink(), 0);
    assert_eq!(printer.pages_printed(), 25);
}

#[tokio::test]
async fn test_closed_task_reports_error() {
    let (handle, task) = spawn_printer_task(Printer::<String>::new(1), 1);
    task.abort();
    let _ = task.await;
    assert_eq!(handle.has_ink().await, Err(PrinterError::ChannelClosed));
}

#[tokio::test]
async fn test_shared_printer_never_overspends() {
    let shared = SharedPrinter::new(Printer::new(30));
    let mut joins = Vec::new();
    for owner in 0..6 {
        let shared = shared.clone();
        joins.push(tokio::spawn(async move { shared.print(batch(owner, 8)).await }));
    }
    let mut printed = Vec::new();
    for join in joins {
        let pages = join.await.unwrap();
        assert_per_owner_order(&pages, 6);
        printed.extend(pages);
    }
    assert_eq!(printed.len(), 30);

    let backlog = shared.clear().await;
    assert_eq!(backlog.len(), 18);
    assert_per_owner_order(&backlog, 6);

    // Every page was either printed or left in the backlog, exactly once.
    let mut all: Vec<_> = printed.into_iter().chain(backlog).collect();
    all.sort_unstable();
    let mut expected: Vec<_> = (0..6).flat_map(|o| batch(o, 8)).collect();
    expected.sort_unstable();
    assert_eq!(all, expected);
}

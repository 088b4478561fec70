use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    key: String,
    index: usize,
    top: u64,
    height: u32,
}

#[derive(Debug, Default)]
struct TestHost {
    element: ScrollMetrics,
    page: ScrollMetrics,
    page_top: u64,
    next_token: u64,
    requested: Vec<FrameToken>,
    canceled: Vec<FrameToken>,
    listening: Vec<ListenerToken>,
    unlistened: Vec<ListenerToken>,
}

impl TestHost {
    fn element(scroll_offset: u64, client_height: u32) -> Self {
        Self {
            element: ScrollMetrics {
                scroll_offset,
                client_height,
            },
            ..Self::default()
        }
    }

    fn last_frame(&self) -> FrameToken {
        *self.requested.last().expect("no frame requested")
    }
}

impl ViewportSource for TestHost {
    fn element_metrics(&self) -> ScrollMetrics {
        self.element
    }

    fn page_metrics(&self) -> ScrollMetrics {
        self.page
    }

    fn element_page_top(&self) -> u64 {
        self.page_top
    }
}

impl FrameScheduler for TestHost {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.requested.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.canceled.push(token);
    }
}

impl PageScrollEvents for TestHost {
    fn listen_page_scroll(&mut self) -> ListenerToken {
        self.next_token += 1;
        let token = ListenerToken(self.next_token);
        self.listening.push(token);
        token
    }

    fn unlisten_page_scroll(&mut self, token: ListenerToken) {
        self.unlistened.push(token);
    }
}

fn key_of(i: usize) -> String {
    format!("row-{i}")
}

fn index_of(key: &String) -> Option<usize> {
    key.strip_prefix("row-").and_then(|s| s.parse().ok())
}

fn options(
    data_length: usize,
    height_of: impl Fn(usize, &String) -> u32 + Send + Sync + 'static,
) -> ListViewOptions<String, Row> {
    ListViewOptions::new(
        data_length,
        key_of,
        index_of,
        height_of,
        |key: &String, style: RowStyle, index: usize, attrs: RowAttrs<String>| {
            assert_eq!(&attrs.item_key, key);
            Row {
                key: key.clone(),
                index,
                top: style.top,
                height: style.height,
            }
        },
    )
}

/// 40 rows, `height(i) = 2i + 2`, so row `i` starts at `i * (i + 1)`.
fn scenario_options() -> ListViewOptions<String, Row> {
    options(40, |i, _| 2 * i as u32 + 2)
        .with_initial_draw(5)
        .with_buffers(10, 5)
}

/// Renders and reconciles until the list stops asking for renders. `actual(i)` is the height the
/// "real" row `i` has once committed.
fn settle(
    list: &mut ListView<String, Row>,
    host: &TestHost,
    actual: impl Fn(usize) -> u32,
) -> Vec<Row> {
    settle_rows(list, host, |r| actual(r.index))
}

/// Renders and reconciles until nothing changes, measuring each committed row with `actual`.
fn settle_rows(
    list: &mut ListView<String, Row>,
    host: &TestHost,
    actual: impl Fn(&Row) -> u32,
) -> Vec<Row> {
    let mut passes = 0;
    loop {
        let out = list.render(host);
        passes += 1;
        let measured: Vec<_> = out
            .rows
            .iter()
            .map(|r| MeasuredRow::new(r.key.clone(), actual(r)))
            .collect();
        if !list.reconcile(measured) {
            return out.rows;
        }
        assert!(passes < 10, "list did not settle");
    }
}

fn scenario_height(i: usize) -> u32 {
    2 * i as u32 + 2
}

/// Mounted and settled list for the 40-row scenario.
fn mounted_scenario(host: &mut TestHost) -> (ListView<String, Row>, Vec<Row>) {
    let mut list = ListView::new(scenario_options());
    settle(&mut list, host, scenario_height);
    list.mount(host);
    let rows = settle(&mut list, host, scenario_height);
    (list, rows)
}

fn heights_cache(heights: &[u32], lookahead: usize) -> PositionCache {
    let mut cache = PositionCache::new().with_lookahead(lookahead);
    cache.resize(heights.len());
    cache
}

#[test]
fn keys_round_trip() {
    for i in 0..1000 {
        assert_eq!(index_of(&key_of(i)), Some(i));
    }
    assert_eq!(index_of(&String::from("nope")), None);
}

#[test]
fn extend_to_is_idempotent_and_never_recomputes() {
    let heights = [5u32; 10];
    let mut cache = heights_cache(&heights, 0);
    let calls = AtomicUsize::new(0);
    let h = |i: usize| {
        calls.fetch_add(1, Ordering::Relaxed);
        heights[i]
    };

    assert_eq!(cache.extend_to(4, h), 4);
    assert_eq!(calls.load(Ordering::Relaxed), 5);

    assert_eq!(cache.extend_to(4, h), 4);
    assert_eq!(cache.extend_to(2, h), 4);
    assert_eq!(calls.load(Ordering::Relaxed), 5);
    assert_eq!(cache.row_position(4, h), RowPosition { y: 20, height: 5 });

    assert_eq!(cache.extend_to(6, h), 6);
    assert_eq!(calls.load(Ordering::Relaxed), 7);
}

#[test]
fn lookahead_extends_past_requested_index() {
    let mut cache = heights_cache(&[1; 50], 10);
    assert_eq!(cache.extend_to(3, |_| 1), 13);
    assert_eq!(cache.extend_to(45, |_| 1), 49);
    assert_eq!(cache.watermark(), Some(49));
}

#[test]
fn invalidate_from_only_recomputes_later_rows() {
    let mut heights = vec![10u32; 10];
    let mut cache = heights_cache(&heights, 0);
    cache.extend_to(9, |i| heights[i]);

    heights[5] = 30;
    cache.invalidate_from(5);
    assert_eq!(cache.watermark(), Some(4));

    let mut calls = Vec::new();
    let pos = cache.row_position(3, |i| {
        calls.push(i);
        heights[i]
    });
    assert_eq!(pos, RowPosition { y: 30, height: 10 });
    assert!(calls.is_empty());

    cache.extend_to(9, |i| {
        calls.push(i);
        heights[i]
    });
    assert_eq!(calls, vec![5, 6, 7, 8, 9]);
    assert_eq!(cache.row_position(5, |i| heights[i]).y, 50);
    assert_eq!(cache.row_position(6, |i| heights[i]).y, 80);
    assert_eq!(cache.row_position(9, |i| heights[i]).y, 110);
}

#[test]
fn invalidate_above_watermark_is_a_no_op() {
    let mut cache = heights_cache(&[1; 10], 0);
    cache.extend_to(3, |_| 1);
    cache.invalidate_from(7);
    assert_eq!(cache.watermark(), Some(3));
    cache.invalidate_from(0);
    assert_eq!(cache.watermark(), None);
}

#[test]
fn cumulative_invariant_holds_under_random_corrections() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..50 {
        let len = rng.gen_range_usize(1, 300);
        let mut heights: Vec<u32> = (0..len).map(|_| rng.gen_range_u32(0, 40)).collect();
        let mut cache = heights_cache(&heights, rng.gen_range_usize(0, 20));

        for _ in 0..20 {
            let i = rng.gen_range_usize(0, len);
            let j = rng.gen_range_usize(i, len);
            for h in &mut heights[i..=j] {
                *h = rng.gen_range_u32(0, 40);
            }
            cache.invalidate_from(i);
            cache.extend_to(j, |k| heights[k]);

            let w = cache.watermark().expect("watermark after extend");
            let mut y = 0u64;
            for k in 0..=w {
                let pos = cache.row_position(k, |k| heights[k]);
                assert_eq!(pos.y, y, "len={len} k={k}");
                assert_eq!(pos.height, heights[k]);
                y += pos.height as u64;
            }
        }
    }
}

#[test]
fn floor_index_finds_greatest_row_at_or_before_offset() {
    let mut rng = Lcg::new(42);
    for _ in 0..50 {
        let len = rng.gen_range_usize(1, 200);
        let heights: Vec<u32> = (0..len).map(|_| rng.gen_range_u32(0, 30)).collect();
        let total: u64 = heights.iter().map(|&h| h as u64).sum();
        let mut cache = heights_cache(&heights, rng.gen_range_usize(0, 8));

        for _ in 0..40 {
            let y = rng.gen_range_u64(0, total + 50);
            let f = cache.floor_index(y, |k| heights[k]);
            assert!(cache.row_position(f, |k| heights[k]).y <= y);
            if f != len - 1 {
                assert!(cache.row_position(f + 1, |k| heights[k]).y > y, "y={y} f={f}");
            }
        }
    }
}

#[test]
fn floor_index_edges() {
    let mut empty = PositionCache::new();
    assert_eq!(empty.floor_index(100, |_| 1), 0);

    let mut cache = heights_cache(&[10; 5], 0);
    assert_eq!(cache.floor_index(0, |_| 10), 0);
    assert_eq!(cache.floor_index(9, |_| 10), 0);
    assert_eq!(cache.floor_index(10, |_| 10), 1);
    assert_eq!(cache.floor_index(49, |_| 10), 4);
    assert_eq!(cache.floor_index(10_000, |_| 10), 4);
}

#[test]
fn floor_index_extends_only_as_far_as_needed() {
    let mut cache = heights_cache(&[10; 1000], 0);
    assert_eq!(cache.floor_index(95, |_| 10), 9);
    assert_eq!(cache.watermark(), Some(9));
}

#[test]
fn resize_drops_tail_and_clamps_watermark() {
    let mut cache = heights_cache(&[3; 10], 0);
    cache.extend_to(8, |_| 3);
    cache.resize(4);
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.watermark(), Some(3));
    assert_eq!(cache.row_position(3, |_| 3).y, 9);

    cache.resize(12);
    assert_eq!(cache.watermark(), Some(3));
    assert_eq!(cache.row_position(11, |_| 1).y, 12 + 7);

    cache.resize(0);
    assert_eq!(cache.watermark(), None);
    assert!(cache.is_empty());
}

#[test]
#[should_panic]
fn row_position_out_of_range_is_a_contract_violation() {
    let mut cache = heights_cache(&[1; 3], 0);
    cache.row_position(3, |_| 1);
}

#[test]
fn estimated_total_height_tracks_known_rows() {
    let mut cache = PositionCache::new()
        .with_lookahead(0)
        .with_default_height(Some(10));
    cache.resize(5);
    assert_eq!(cache.estimated_total_height(), 50);
    cache.extend_to(1, |_| 4);
    assert_eq!(cache.estimated_total_height(), 8 + 3 * 10);
    cache.extend_to(4, |_| 4);
    assert_eq!(cache.estimated_total_height(), 20);

    let mut extrapolated = PositionCache::new().with_lookahead(0);
    extrapolated.resize(5);
    assert_eq!(extrapolated.estimated_total_height(), 0);
    extrapolated.extend_to(1, |i| if i == 0 { 2 } else { 6 });
    // average of computed rows (4) for the 3 unknown rows
    assert_eq!(extrapolated.estimated_total_height(), 8 + 12);
}

#[test]
fn extrapolated_total_height_keeps_fractional_average() {
    let mut cache = PositionCache::new().with_lookahead(0);
    cache.resize(1000);
    cache.extend_to(1, |i| if i == 0 { 7 } else { 8 });
    assert_eq!(cache.estimated_total_height(), 7500);
}

#[test]
fn window_keeps_drawn_range_while_min_buffer_is_covered() {
    let w = WindowCalculator::new(10, 5);
    let drawn = Some(IndexRange::new(0, 26));

    let d = w.decide(Some(IndexRange::new(2, 17)), drawn, 40);
    assert_eq!(d, WindowDecision::Keep(IndexRange::new(0, 26)));

    let d = w.decide(Some(IndexRange::new(19, 25)), drawn, 40);
    assert_eq!(d, WindowDecision::Redraw(IndexRange::new(9, 35)));

    // Only the smaller tier is checked, the larger one is applied.
    let d = w.decide(Some(IndexRange::new(3, 21)), drawn, 40);
    assert_eq!(d, WindowDecision::Keep(IndexRange::new(0, 26)));
    let d = w.decide(Some(IndexRange::new(3, 22)), drawn, 40);
    assert_eq!(d, WindowDecision::Redraw(IndexRange::new(0, 32)));
}

#[test]
fn window_clamps_to_shrunken_lists() {
    let w = WindowCalculator::new(10, 5);
    let drawn = Some(IndexRange::new(0, 26));
    assert_eq!(
        w.decide(Some(IndexRange::new(0, 9)), drawn, 10),
        WindowDecision::Keep(IndexRange::new(0, 9))
    );
    assert_eq!(
        w.decide(Some(IndexRange::new(0, 3)), Some(IndexRange::new(20, 26)), 10),
        WindowDecision::Redraw(IndexRange::new(0, 9))
    );
    assert_eq!(w.decide(None, drawn, 0), WindowDecision::Empty);
    assert_eq!(w.initial_range(0), None);
    assert_eq!(
        WindowCalculator::new(0, 0).with_initial_draw(5).initial_range(3),
        Some(IndexRange::new(0, 2))
    );
}

#[test]
fn scroll_notifications_coalesce_into_one_frame() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);

    for _ in 0..10 {
        host.element.scroll_offset += 7;
        list.on_scroll(&mut host);
    }
    assert_eq!(host.requested.len(), 1);
    assert_eq!(list.phase(), Phase::Pending);

    list.on_frame(host.last_frame(), &host);
    assert_eq!(list.phase(), Phase::Idle);

    list.on_scroll(&mut host);
    assert_eq!(host.requested.len(), 2);
}

#[test]
fn scheduler_ignores_stale_tokens() {
    let mut host = TestHost::default();
    let mut s = RenderScheduler::new();
    assert!(s.on_scroll(&mut host));
    assert!(!s.on_scroll(&mut host));
    assert!(!s.on_frame(FrameToken(999)));
    assert!(s.is_pending());
    assert!(s.on_frame(host.last_frame()));
    assert!(!s.on_frame(host.last_frame()));

    s.on_scroll(&mut host);
    s.cancel(&mut host);
    assert_eq!(host.canceled, vec![host.last_frame()]);
    assert!(!s.is_pending());
}

#[test]
fn initial_draw_before_viewport_is_measured() {
    let host = TestHost::element(0, 300);
    let mut list = ListView::new(scenario_options());
    assert_eq!(list.phase(), Phase::Unmeasured);

    let out = list.render(&host);
    assert_eq!(out.drawn, Some(IndexRange::new(0, 4)));
    let tops: Vec<u64> = out.rows.iter().map(|r| r.top).collect();
    assert_eq!(tops, vec![0, 2, 6, 12, 20]);
    assert_eq!(out.scroll_mode, ScrollMode::SelfScroll);
    assert_eq!(list.phase(), Phase::Unmeasured);
}

#[test]
fn scenario_at_top_of_list() {
    let mut host = TestHost::element(0, 300);
    let (list, rows) = mounted_scenario(&mut host);

    assert_eq!(list.phase(), Phase::Idle);
    assert_eq!(list.visible_range(), Some(IndexRange::new(0, 16)));
    assert_eq!(list.drawn_range(), Some(IndexRange::new(0, 26)));
    assert_eq!(rows.first().map(|r| r.index), Some(0));
    assert!(rows.iter().all(|r| r.index != 39));
    assert_eq!(rows[0].top, 0);
    assert_eq!(rows[1].top, 2);
    assert_eq!(list.estimated_total_height(), 40 * 41);
}

#[test]
fn scenario_scrolled_to_400() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);

    host.element.scroll_offset = 400;
    list.on_scroll(&mut host);
    assert!(list.on_frame(host.last_frame(), &host));
    let rows = settle(&mut list, &host, scenario_height);

    let mut expected = 0usize;
    let mut y = 0u64;
    while y + scenario_height(expected) as u64 <= 400 {
        y += scenario_height(expected) as u64;
        expected += 1;
    }
    assert_eq!(expected, 19);
    assert_eq!(list.top_visible_index(), expected);
    assert_eq!(list.row_position(expected).map(|p| p.y), Some(380));
    assert_eq!(list.drawn_range(), Some(IndexRange::new(9, 35)));
    assert!(rows.iter().all(|r| r.top == (r.index * (r.index + 1)) as u64));
}

#[test]
fn small_scrolls_inside_min_buffer_do_not_render() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);
    let renders = list.render_count();

    host.element.scroll_offset = 10;
    list.on_scroll(&mut host);
    assert!(!list.on_frame(host.last_frame(), &host));
    assert!(!list.take_render_request());
    assert_eq!(list.render_count(), renders);
    assert_eq!(list.drawn_range(), Some(IndexRange::new(0, 26)));
}

#[test]
fn long_lists_stay_virtualized() {
    let mut host = TestHost::element(0, 400);
    let mut list = ListView::new(
        options(10_000, |_, _| 20)
            .with_initial_draw(50)
            .with_buffers(10, 5),
    );
    settle(&mut list, &host, |_| 20);
    list.mount(&mut host);
    let rows = settle(&mut list, &host, |_| 20);
    assert!(rows.len() < 10_000);
    assert!(rows.len() <= 50);

    for offset in [5_000u64, 50_000, 199_000] {
        host.element.scroll_offset = offset;
        list.on_scroll(&mut host);
        list.on_frame(host.last_frame(), &host);
        let rows = settle(&mut list, &host, |_| 20);
        assert!(rows.len() <= 2 * 10 + 21 + 1, "offset={offset} rows={}", rows.len());
        let visible = list.visible_range().expect("visible range");
        let drawn = list.drawn_range().expect("drawn range");
        assert!(drawn.covers(visible));
    }
    assert_eq!(list.estimated_total_height(), 200_000);
}

#[test]
fn empty_and_single_item_lists() {
    let mut host = TestHost::element(0, 300);
    let mut list = ListView::new(options(0, |_, _| 10).with_buffers(2, 1));
    assert!(settle(&mut list, &host, |_| 10).is_empty());
    list.mount(&mut host);
    assert!(settle(&mut list, &host, |_| 10).is_empty());
    assert_eq!(list.drawn_range(), None);
    assert_eq!(list.estimated_total_height(), 0);
    assert_eq!(list.row_position(0), None);

    let mut list = ListView::new(options(1, |_, _| 10).with_buffers(2, 1));
    assert_eq!(settle(&mut list, &host, |_| 10).len(), 1);
    list.mount(&mut host);
    let rows = settle(&mut list, &host, |_| 10);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].top, 0);
    assert_eq!(rows[0].index, 0);
}

#[test]
fn measured_heights_correct_offsets_and_settle() {
    let host = TestHost::element(0, 300);
    let mut list = ListView::new(scenario_options());

    let out = list.render(&host);
    let measured: Vec<_> = out
        .rows
        .iter()
        .map(|r| MeasuredRow::new(r.key.clone(), 30))
        .collect();
    assert!(list.reconcile(measured));
    assert!(list.take_render_request());

    let out = list.render(&host);
    let tops: Vec<u64> = out.rows.iter().map(|r| r.top).collect();
    assert_eq!(tops, vec![0, 30, 60, 90, 120]);
    // Rows past the correction keep their estimate, shifted.
    assert_eq!(list.row_position(5), Some(RowPosition { y: 150, height: 12 }));

    let measured: Vec<_> = out
        .rows
        .iter()
        .map(|r| MeasuredRow::new(r.key.clone(), 30))
        .collect();
    assert!(!list.reconcile(measured));
    assert!(!list.take_render_request());
    assert_eq!(list.known_heights_len(), 5);
}

#[test]
fn rows_without_keys_are_skipped() {
    let host = TestHost::element(0, 300);
    let mut list = ListView::new(scenario_options());
    list.render(&host);

    assert!(!list.reconcile(vec![
        MeasuredRow::unkeyed(50),
        MeasuredRow::new(String::from("gone"), 50)
    ]));
    assert_eq!(list.known_heights_len(), 0);
    assert!(!list.take_render_request());
}

#[test]
fn reconcile_reports_min_and_max_changed_index() {
    let mut r = HeightReconciler::<String>::new();
    let dirty = r.reconcile(
        vec![
            MeasuredRow::new(key_of(7), 3),
            MeasuredRow::new(key_of(2), 3),
            MeasuredRow::new(key_of(4), 3),
        ],
        index_of,
        |_| None,
    );
    assert_eq!(dirty, Some(IndexRange::new(2, 7)));

    let dirty = r.reconcile(
        vec![MeasuredRow::new(key_of(7), 3), MeasuredRow::new(key_of(4), 9)],
        index_of,
        |_| None,
    );
    assert_eq!(dirty, Some(IndexRange::new(4, 4)));
    assert_eq!(r.known_height(&key_of(4)), Some(9));

    // Known height unchanged, but the index still holds another item's cached height.
    let dirty = r.reconcile(
        vec![MeasuredRow::new(key_of(7), 3), MeasuredRow::new(key_of(4), 9)],
        index_of,
        |i| Some(if i == 7 { 5 } else { 9 }),
    );
    assert_eq!(dirty, Some(IndexRange::new(7, 7)));
    assert_eq!(r.known_height(&key_of(7)), Some(3));
}

#[test]
fn measured_heights_follow_keys_across_reorder() {
    let host = TestHost::element(0, 300);
    let mut list = ListView::new(scenario_options());
    list.render(&host);
    list.reconcile(vec![MeasuredRow::new(key_of(0), 100)]);
    assert_eq!(list.row_position(0).map(|p| p.height), Some(100));

    // Reverse the data set: key row-0 now lives at index 39.
    list.update_options(|o| {
        o.key_of = Arc::new(|i: usize| key_of(39 - i));
        o.index_of = Arc::new(|k: &String| index_of(k).map(|i| 39 - i));
    });
    assert_eq!(list.row_position(39).map(|p| p.height), Some(100));
    // Unmeasured rows still use the index-based estimate.
    assert_eq!(list.row_position(0).map(|p| p.height), Some(scenario_height(0)));
    assert_eq!(list.known_height(&key_of(0)), Some(100));
}

type SharedItems = Arc<Mutex<Vec<String>>>;

fn shared_items(keys: &[&str]) -> SharedItems {
    Arc::new(Mutex::new(keys.iter().map(|k| String::from(*k)).collect()))
}

/// Key functions that read the live item list, so they stay the same closures while the data
/// underneath them changes.
fn shared_options(items: &SharedItems) -> ListViewOptions<String, Row> {
    let len = items.lock().unwrap().len();
    let keys = Arc::clone(items);
    let lookup = Arc::clone(items);
    options(len, |_, _| 10).with_key_mapping(
        move |i| keys.lock().unwrap()[i].clone(),
        move |k: &String| lookup.lock().unwrap().iter().position(|x| x == k),
    )
}

fn tall_b(row: &Row) -> u32 {
    if row.key == "b" { 100 } else { 10 }
}

fn layout(rows: &[Row]) -> Vec<(&str, u64, u32)> {
    rows.iter()
        .map(|r| (r.key.as_str(), r.top, r.height))
        .collect()
}

fn mounted_shared(items: &SharedItems, host: &mut TestHost) -> ListView<String, Row> {
    let mut list = ListView::new(shared_options(items));
    settle_rows(&mut list, host, tall_b);
    list.mount(host);
    settle_rows(&mut list, host, tall_b);
    list
}

#[test]
fn removing_a_row_reflows_later_rows_with_stable_key_functions() {
    let items = shared_items(&["a", "b", "c", "d", "e"]);
    let mut host = TestHost::element(0, 300);
    let mut list = mounted_shared(&items, &mut host);
    assert_eq!(list.row_position(2), Some(RowPosition { y: 110, height: 10 }));

    items.lock().unwrap().remove(1);
    list.set_data_length(4);
    let rows = settle_rows(&mut list, &host, tall_b);

    assert_eq!(
        layout(&rows),
        vec![("a", 0, 10), ("c", 10, 10), ("d", 20, 10), ("e", 30, 10)]
    );
    assert_eq!(list.estimated_total_height(), 40);
}

#[test]
fn inserting_a_row_reflows_later_rows_with_stable_key_functions() {
    let items = shared_items(&["a", "c", "d", "e"]);
    let mut host = TestHost::element(0, 300);
    let mut list = mounted_shared(&items, &mut host);
    assert_eq!(list.estimated_total_height(), 40);

    items.lock().unwrap().insert(1, String::from("b"));
    list.set_data_length(5);
    let rows = settle_rows(&mut list, &host, tall_b);

    assert_eq!(
        layout(&rows),
        vec![
            ("a", 0, 10),
            ("b", 10, 100),
            ("c", 110, 10),
            ("d", 120, 10),
            ("e", 130, 10)
        ]
    );
}

#[test]
fn reordering_rows_in_place_reflows_with_stable_key_functions() {
    let items = shared_items(&["a", "b", "c", "d", "e"]);
    let mut host = TestHost::element(0, 300);
    let mut list = mounted_shared(&items, &mut host);

    items.lock().unwrap().swap(0, 1);
    list.force_render();
    let rows = settle_rows(&mut list, &host, tall_b);

    assert_eq!(
        layout(&rows),
        vec![
            ("b", 0, 100),
            ("a", 100, 10),
            ("c", 110, 10),
            ("d", 120, 10),
            ("e", 130, 10)
        ]
    );
    assert_eq!(list.known_height(&String::from("b")), Some(100));
}

#[test]
fn known_heights_export_and_import() {
    let host = TestHost::element(0, 300);
    let mut a = ListView::new(scenario_options());
    let out = a.render(&host);
    a.reconcile(out.rows.iter().map(|r| MeasuredRow::new(r.key.clone(), 11)));
    let mut exported = a.export_known_heights();
    exported.sort();
    assert_eq!(exported.len(), 5);

    let mut b = ListView::new(scenario_options());
    b.import_known_heights(exported);
    assert!(b.take_render_request());
    assert_eq!(b.row_position(4), Some(RowPosition { y: 44, height: 11 }));

    b.reset_known_heights();
    assert_eq!(b.known_heights_len(), 0);
    assert_eq!(b.row_position(4), Some(RowPosition { y: 20, height: 10 }));
}

#[test]
fn shrinking_data_clamps_drawn_range() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);

    list.set_data_length(10);
    assert!(list.take_render_request());
    let rows = settle(&mut list, &host, scenario_height);
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.index < 10));
    assert_eq!(list.drawn_range(), Some(IndexRange::new(0, 9)));

    list.set_data_length(0);
    assert!(settle(&mut list, &host, scenario_height).is_empty());
    assert_eq!(list.drawn_range(), None);

    // Heights measured earlier are still known by key.
    list.set_data_length(40);
    assert_eq!(list.known_height(&key_of(3)), Some(8));
}

#[test]
fn force_render_keeps_drawn_range() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);
    let renders = list.render_count();

    list.force_render();
    assert!(list.take_render_request());
    let out = list.render(&host);
    assert_eq!(out.drawn, Some(IndexRange::new(0, 26)));
    assert_eq!(list.render_count(), renders + 1);
}

#[test]
fn host_scroll_reads_page_with_captured_offset() {
    let mut host = TestHost {
        page: ScrollMetrics {
            scroll_offset: 0,
            client_height: 300,
        },
        page_top: 100,
        ..TestHost::default()
    };
    let mut list = ListView::new(scenario_options().with_host_scroll(true));
    settle(&mut list, &host, scenario_height);
    list.mount(&mut host);
    assert_eq!(host.listening.len(), 1);
    assert_eq!(list.viewport(), Some(Viewport { offset: 0, height: 200 }));

    // The top offset is captured once; later layout shifts are ignored.
    host.page_top = 5_000;
    host.page.scroll_offset = 500;
    list.on_scroll(&mut host);
    list.on_frame(host.last_frame(), &host);
    assert_eq!(list.viewport(), Some(Viewport { offset: 400, height: 300 }));
    assert_eq!(list.top_visible_index(), 19);
    assert_eq!(list.viewport_height(), 300);

    let out = list.render(&host);
    assert_eq!(out.scroll_mode, ScrollMode::HostScroll);

    list.unmount(&mut host);
    assert_eq!(host.unlistened, host.listening);
}

#[test]
fn self_scroll_never_registers_page_listener() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);
    list.unmount(&mut host);
    assert!(host.listening.is_empty());
    assert!(host.unlistened.is_empty());
}

#[test]
fn unmount_cancels_pending_frame_and_is_terminal() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);

    host.element.scroll_offset = 900;
    list.on_scroll(&mut host);
    let token = host.last_frame();
    list.unmount(&mut host);
    assert_eq!(host.canceled, vec![token]);
    assert_eq!(list.phase(), Phase::Unmounted);

    assert!(!list.on_frame(token, &host));
    list.on_scroll(&mut host);
    assert_eq!(host.requested.len(), 1);
    list.force_render();
    assert!(!list.take_render_request());
    assert!(!list.reconcile(vec![MeasuredRow::new(key_of(0), 1)]));
}

#[test]
fn imperative_surface_before_mount() {
    let mut list = ListView::new(scenario_options());
    assert_eq!(list.viewport_height(), 0);
    assert_eq!(list.top_visible_index(), 0);
    assert_eq!(list.bottom_visible_index(), 0);
    assert_eq!(list.row_position(2), Some(RowPosition { y: 6, height: 6 }));
    assert_eq!(list.row_position(40), None);
}

#[test]
fn bottom_visible_index_uses_viewport_end() {
    let mut host = TestHost::element(0, 300);
    let (mut list, _) = mounted_scenario(&mut host);
    assert_eq!(list.viewport_height(), 300);
    assert_eq!(list.top_visible_index(), 0);
    assert_eq!(list.bottom_visible_index(), 16);
}

#[test]
fn render_requests_invoke_callback() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let host = TestHost::element(0, 300);
    let mut list = ListView::new(
        scenario_options().with_on_render_request(Some(move || {
            c.fetch_add(1, Ordering::Relaxed);
        })),
    );
    list.render(&host);
    list.force_render();
    assert_eq!(count.load(Ordering::Relaxed), 1);
    list.reconcile(vec![MeasuredRow::new(key_of(0), 2)]);
    assert_eq!(count.load(Ordering::Relaxed), 2);
}

#[test]
fn state_snapshot_reflects_list() {
    let mut host = TestHost::element(0, 300);
    let (list, _) = mounted_scenario(&mut host);
    let state = list.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.data_length, 40);
    assert_eq!(state.drawn, Some(IndexRange::new(0, 26)));
    assert_eq!(state.visible, Some(IndexRange::new(0, 16)));
    assert_eq!(state.viewport, Some(Viewport { offset: 0, height: 300 }));
    assert_eq!(state.track_height, 1640);
    assert_eq!(state.known_heights, 27);
    assert_eq!(state.watermark, Some(39));
    assert_eq!(state.render_count, list.render_count());
}

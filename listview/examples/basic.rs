// Example: embedding a ListView directly, with a tiny in-process host.
use listview::{
    FrameScheduler, FrameToken, ListView, ListViewOptions, ListenerToken, MeasuredRow,
    PageScrollEvents, RowAttrs, RowStyle, ScrollMetrics, ViewportSource,
};

#[derive(Default)]
struct Host {
    scroll: u64,
    next: u64,
    frames: Vec<FrameToken>,
}

impl ViewportSource for Host {
    fn element_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_offset: self.scroll,
            client_height: 400,
        }
    }

    fn page_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::default()
    }

    fn element_page_top(&self) -> u64 {
        0
    }
}

impl FrameScheduler for Host {
    fn request_frame(&mut self) -> FrameToken {
        self.next += 1;
        self.frames.push(FrameToken(self.next));
        FrameToken(self.next)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|&t| t != token);
    }
}

impl PageScrollEvents for Host {
    fn listen_page_scroll(&mut self) -> ListenerToken {
        ListenerToken(0)
    }

    fn unlisten_page_scroll(&mut self, _token: ListenerToken) {}
}

// Real row heights, unknown to the list until measured.
fn actual_height(i: usize) -> u32 {
    24 + (i % 7) as u32 * 6
}

fn main() {
    let options = ListViewOptions::new(
        1_000_000,
        |i| i as u64,
        |k: &u64| Some(*k as usize),
        |_, _| 30,
        |key: &u64, style: RowStyle, _index: usize, _attrs: RowAttrs<u64>| (*key, style),
    )
    .with_buffers(20, 5)
    .with_initial_draw(40);
    let mut list = ListView::new(options);
    let mut host = Host::default();

    let commit = |list: &mut ListView<u64, (u64, RowStyle)>, host: &Host| {
        let out = list.render(host);
        let measured = out
            .rows
            .iter()
            .map(|(key, _)| MeasuredRow::new(*key, actual_height(*key as usize)));
        list.reconcile(measured);
        out
    };

    let first = commit(&mut list, &host);
    list.mount(&mut host);
    while list.take_render_request() {
        commit(&mut list, &host);
    }
    println!("first draw: {:?}, track={}", first.drawn, first.track_height);

    for _ in 0..3 {
        host.scroll += 50_000;
        list.on_scroll(&mut host);
    }
    for token in std::mem::take(&mut host.frames) {
        list.on_frame(token, &host);
    }
    while list.take_render_request() {
        let out = commit(&mut list, &host);
        println!("drawn={:?} track={}", out.drawn, out.track_height);
    }
    println!("state={:?}", list.state());
}

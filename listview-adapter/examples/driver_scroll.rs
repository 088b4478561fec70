use listview::{Align, ListViewOptions, MeasuredRow, RowAttrs, RowStyle, ScrollMode};
use listview_adapter::{Direction, Driver, HeadlessHost};

fn main() {
    // Example: a headless driver loop.
    //
    // An adapter would:
    // - forward user scrolls (or navigation commands) to the driver
    // - call tick() once per display frame
    // - paint driver.rows() at their `top` offsets inside a track of content_height()
    let options = ListViewOptions::new(
        5_000,
        |i| i as u64,
        |k: &u64| Some(*k as usize),
        |_, _| 32,
        |key: &u64, style: RowStyle, _index: usize, _attrs: RowAttrs<u64>| (*key, style.top),
    )
    .with_buffers(30, 10)
    .with_initial_draw(60);

    let host = HeadlessHost::new(ScrollMode::SelfScroll, 600);
    let mut d = Driver::new(options, host, |&(key, _): &(u64, u64)| {
        MeasuredRow::new(key, 28 + (key % 5) as u32 * 8)
    });
    d.mount();

    d.scroll_to_row(2_500, Align::Center);
    d.tick();
    println!(
        "offset={} drawn={:?} track={}",
        d.host().list_offset(),
        d.list().drawn_range(),
        d.host().content_height()
    );

    for _ in 0..5 {
        d.page_down();
        d.tick();
    }
    d.scroll_past(2_600, Direction::Down);
    let passes = d.tick();
    println!(
        "offset={} drawn={:?} passes={passes} first={:?}",
        d.host().list_offset(),
        d.list().drawn_range(),
        d.rows().first()
    );

    d.unmount();
    println!("phase={:?}", d.list().phase());
}

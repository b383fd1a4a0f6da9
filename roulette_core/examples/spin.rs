use roulette_core::{
    FrameQueue, ManualClock, Roulette, RouletteConfig, SeededStream, SpinEvent, WheelItems,
};
use std::time::Duration;

fn main() {
    // Example end-to-end spin on a simulated 60 Hz display
    let clock = ManualClock::new();
    let mut roulette = Roulette::new(
        WheelItems::parse_csv("pizza,sushi,tacos,ramen").expect("items"),
        RouletteConfig::default(),
        clock.clone(),
        FrameQueue::new(),
        SeededStream::new("example-server-seed", "example-client-seed", 1),
        SeededStream::new("example-server-seed", "palette", 1),
    );
    roulette.subscribe(|event: &SpinEvent| {
        if let SpinEvent::Started { duration, .. } = event {
            println!("spinning for {duration:?}");
        }
    });

    for (item, color) in roulette.items().iter().zip(roulette.palette()) {
        println!("{item:>8} {}", color.to_css());
    }

    roulette.spin().expect("spin");
    'frames: loop {
        clock.advance(Duration::from_micros(16_667));
        for token in roulette.scheduler_mut().take_due() {
            if let Some((outcome, entry)) = roulette.on_frame(token) {
                println!(
                    "rotation={:.4} index={} winner={}",
                    outcome.rotation, outcome.index, entry.item
                );
                break 'frames;
            }
        }
    }
}

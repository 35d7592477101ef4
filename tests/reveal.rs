use notes_dom::reveal::RevealTracker;

#[test]
fn intersections_reveal_once() {
	let mut tracker = RevealTracker::new(2);
	assert!(!tracker.intersected(0, false));
	assert!(tracker.intersected(0, true));
	assert!(!tracker.intersected(0, true));
	assert!(tracker.is_revealed(0));
	assert!(!tracker.is_complete());

	// Leaving the viewport again doesn't un-reveal.
	assert!(!tracker.intersected(0, false));
	assert!(tracker.is_revealed(0));

	assert!(tracker.intersected(1, true));
	assert!(tracker.is_complete());
}

#[test]
fn scrolling_reveals_above_the_threshold_line() {
	let mut tracker = RevealTracker::new(3);
	let viewport = 1000.0;
	let tops = [100.0, 900.0, 2000.0];

	let revealed: Vec<_> = (0..3).filter(|&i| tracker.scrolled(i, tops[i], viewport, 0.85)).collect();
	assert_eq!(revealed, [0]);

	// Scrolled down by 500px.
	let revealed: Vec<_> = (0..3).filter(|&i| tracker.scrolled(i, tops[i] - 500.0, viewport, 0.85)).collect();
	assert_eq!(revealed, [1]);
	assert!(!tracker.is_complete());

	// Back to the top: nothing is hidden again.
	let revealed: Vec<_> = (0..3).filter(|&i| tracker.scrolled(i, tops[i], viewport, 0.85)).collect();
	assert!(revealed.is_empty());
	assert_eq!(tracker.revealed_count(), 2);
}

#[test]
fn both_paths_converge() {
	let mut pushed = RevealTracker::new(3);
	let mut pulled = RevealTracker::new(3);
	for i in 0..3 {
		pushed.intersected(i, true);
		pulled.scrolled(i, 0.0, 800.0, 0.85);
	}
	assert!(pushed.is_complete());
	assert_eq!(pushed, pulled);
}

#[test]
fn out_of_range_indices_are_ignored() {
	let mut tracker = RevealTracker::new(1);
	assert!(!tracker.intersected(5, true));
	assert!(!tracker.is_complete());
	assert!(RevealTracker::new(0).is_complete());
}

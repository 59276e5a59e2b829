//! Analog clock face, integer arithmetic only
//!
//! The dial is traced by rotating a fixed-point vector (scaled by 2^9) about
//! one degree at a time:
//!
//! ```text
//! x += (y >> 9) * D
//! y -= (x >> 9) * D      // uses the x just computed
//! ```
//!
//! with `D = 9`. Starting at 12 o'clock this walks clockwise and comes back
//! to the start after 360 steps. It is not a true
//! circle and it does not need to be: ticks and hands are placed by step
//! index along this very walk, so the recurrence must stay exactly as it is.
//!
//! Hands are picked up during the same walk:
//!  - ticks every 30 steps, from 7/8 of the radius out to the dial
//!  - hour hand at step `hour * 30 + minute / 2`, 3/4 of the radius
//!  - minute hand at step `minute * 6 + second / 10`, full radius
//!  - second hand at step `second * 6`, a plain line
use crate::framebuffer::{FrameBuffer, Pen};
use crate::RADIUS;

/// Fixed-point shift of the rotation.
pub const SCALE_SHIFT: u32 = 9;
/// Rotation per step in 1/2^9 radians, about one degree.
pub const STEP_DELTA: i32 = 9;
/// Steps in one turn of the dial.
pub const STEPS: u16 = 360;

const TICK_EVERY: u16 = 30;

/// A point in dial coordinates, origin at the centre, y up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Point { x, y }
    }

    /// Point scaled towards the centre by `num / den`.
    pub fn scaled(self, num: i16, den: i16) -> Point {
        Point::new(self.x * num / den, self.y * num / den)
    }
}

/// Walks the dial clockwise from 12 o'clock, yielding `(step, point)` for
/// steps `0..=STEPS`. The last point is where the walk closes.
#[derive(Debug, Clone)]
pub struct DialTraversal {
    x: i32,
    y: i32,
    step: u16,
}

impl DialTraversal {
    pub fn new(radius: i16) -> Self {
        DialTraversal {
            x: 0,
            y: i32::from(radius) << SCALE_SHIFT,
            step: 0,
        }
    }

    fn point(&self) -> Point {
        Point::new((self.x >> SCALE_SHIFT) as i16, (self.y >> SCALE_SHIFT) as i16)
    }
}

impl Iterator for DialTraversal {
    type Item = (u16, Point);

    fn next(&mut self) -> Option<(u16, Point)> {
        if self.step > STEPS {
            return None;
        }
        let item = (self.step, self.point());
        self.x += (self.y >> SCALE_SHIFT) * STEP_DELTA;
        self.y -= (self.x >> SCALE_SHIFT) * STEP_DELTA;
        self.step += 1;
        Some(item)
    }
}

/// Point of the standard dial at `step`.
pub fn dial_point(step: u16) -> Point {
    DialTraversal::new(RADIUS)
        .nth(usize::from(step % STEPS))
        .map(|(_, point)| point)
        .unwrap_or_default()
}

pub fn hour_step(hours: u8, minutes: u8) -> u16 {
    u16::from(hours % 12) * 30 + u16::from(minutes % 60) / 2
}

pub fn minute_step(minutes: u8, seconds: u8) -> u16 {
    u16::from(minutes % 60) * 6 + u16::from(seconds % 60) / 10
}

pub fn second_step(seconds: u8) -> u16 {
    u16::from(seconds % 60) * 6
}

/// Where the hand tips end up for a given time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hands {
    pub hour: Point,
    pub minute: Point,
    pub second: Option<Point>,
}

impl Hands {
    pub fn at(hours: u8, minutes: u8, seconds: Option<u8>) -> Self {
        let sec = seconds.unwrap_or(0);
        Hands {
            hour: dial_point(hour_step(hours, minutes)).scaled(3, 4),
            minute: dial_point(minute_step(minutes, sec)),
            second: seconds.map(|s| dial_point(second_step(s))),
        }
    }
}

/// Draws a full clock face into `buffer`, which is cleared first.
///
/// `seconds` of `None` leaves the second hand out.
pub fn render_face(buffer: &mut FrameBuffer, hours: u8, minutes: u8, seconds: Option<u8>) {
    buffer.clear();

    let hour_at = hour_step(hours, minutes);
    let minute_at = minute_step(minutes, seconds.unwrap_or(0));
    let second_at = seconds.map(second_step);

    let mut hands = Hands::default();
    let mut pen = Pen::new();
    for (step, point) in DialTraversal::new(RADIUS) {
        if step == 0 {
            pen.move_to(point.x, point.y);
        } else {
            pen.line_to(buffer, point.x, point.y);
        }
        if step == STEPS {
            break;
        }

        if step % TICK_EVERY == 0 {
            let inner = point.scaled(7, 8);
            pen.move_to(inner.x, inner.y);
            pen.line_to(buffer, point.x, point.y);
        }
        if step == hour_at {
            hands.hour = point.scaled(3, 4);
        }
        if step == minute_at {
            hands.minute = point;
        }
        if Some(step) == second_at {
            hands.second = Some(point);
        }
    }

    draw_hand(buffer, &mut pen, hands.hour);
    draw_hand(buffer, &mut pen, hands.minute);
    if let Some(tip) = hands.second {
        pen.move_to(0, 0);
        pen.line_to(buffer, tip.x, tip.y);
    }
}

/// Tapered hand: centre, left shoulder, tip, right shoulder, back to centre.
///
/// The shoulders sit at half length, pushed sideways by a fifth of the half
/// vector with its coordinates swapped. Close enough to perpendicular.
pub fn draw_hand(buffer: &mut FrameBuffer, pen: &mut Pen, tip: Point) {
    let half = tip.scaled(1, 2);
    let offset = Point::new(half.y / 5, -half.x / 5);
    let left = Point::new(half.x - offset.x, half.y - offset.y);
    let right = Point::new(half.x + offset.x, half.y + offset.y);

    pen.move_to(0, 0);
    for point in [left, tip, right, Point::new(0, 0)].iter() {
        pen.line_to(buffer, point.x, point.y);
    }
}

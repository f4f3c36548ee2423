//! Scene loops: title, stage, run, and the application loop tying them together.
//!
//! Every loop ticks the frame driver exactly once per iteration, finishes the
//! frame it started, and only then honours a close request. Each loop reports
//! how it ended through its return value, so an outer loop knows whether to
//! carry on or unwind.

use std::io;

use log::info;
use rand::Rng;

use crate::compute::{step_frame, FrameSignal};
use crate::driver::{FrameDriver, Input, LogicalKey};
use crate::entities::StageState;
use crate::render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleExit {
    Start,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageExit {
    /// Cleared and confirmed with fire: play the next stage.
    Advance,
    /// Died and confirmed with fire: back to the title.
    GameOver,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    GameOver,
    Quit,
}

/// Show the title until fire is held.
pub fn title_scene<D: FrameDriver + ?Sized>(driver: &mut D) -> io::Result<TitleExit> {
    loop {
        let quit = driver.tick()?;
        let start = driver.is_held(LogicalKey::Fire);
        render::draw_title(driver);

        if quit {
            return Ok(TitleExit::Quit);
        }
        if start {
            return Ok(TitleExit::Start);
        }
    }
}

/// Play `state` frame by frame until the player confirms the outcome or quits.
pub fn play_stage<D, R>(driver: &mut D, state: &mut StageState, rng: &mut R) -> io::Result<StageExit>
where
    D: FrameDriver + ?Sized,
    R: Rng + ?Sized,
{
    info!("stage {} started", state.stage);
    loop {
        let quit = driver.tick()?;
        let input = driver.sample();
        let signal = step_frame(state, &input, driver, rng);

        if quit {
            info!("close requested during stage {}", state.stage);
            return Ok(StageExit::Quit);
        }
        match signal {
            FrameSignal::Continue => {}
            FrameSignal::NextStage => return Ok(StageExit::Advance),
            FrameSignal::ReturnToTitle => return Ok(StageExit::GameOver),
        }
    }
}

/// One run: stage 1 onwards until a confirmed death.
pub fn run_game<D, R>(driver: &mut D, rng: &mut R) -> io::Result<RunExit>
where
    D: FrameDriver + ?Sized,
    R: Rng + ?Sized,
{
    let mut stage = 1;
    loop {
        let mut state = StageState::new(stage);
        match play_stage(driver, &mut state, rng)? {
            StageExit::Advance => stage += 1,
            StageExit::GameOver => {
                info!("run ended on stage {}", stage);
                return Ok(RunExit::GameOver);
            }
            StageExit::Quit => return Ok(RunExit::Quit),
        }
    }
}

/// Alternate between the title screen and runs until a close is requested.
pub fn run<D, R>(driver: &mut D, rng: &mut R) -> io::Result<()>
where
    D: FrameDriver + ?Sized,
    R: Rng + ?Sized,
{
    loop {
        if title_scene(driver)? == TitleExit::Quit {
            break;
        }
        if run_game(driver, rng)? == RunExit::Quit {
            break;
        }
    }
    info!("quitting");
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{format_err, Error};
use log::info;
use num::Complex;
use std::path::Path;
use std::str::FromStr;

use polybrot::config::{ANIMATION_OUTPUT, STILL_OUTPUT};
use polybrot::{sink, EscapeFunction, RenderConfig, Sweep};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const PNG: &str = "png";
const GIF: &str = "gif";
const OUTPUT: &str = "output";
const WIDTH: &str = "width";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const START: &str = "start";
const END: &str = "end";
const STEP: &str = "step";

/// The options both subcommands share.  Defaults differ between the
/// still and the animation, so they are passed in.
fn common_args(
    output: &'static str,
    width: &'static str,
    iterations: &'static str,
) -> Vec<Arg<'static, 'static>> {
    let max_threads = num_cpus::get();

    vec![
        Arg::with_name(OUTPUT)
            .long(OUTPUT)
            .short("o")
            .takes_value(true)
            .default_value(output)
            .help("Output file"),
        Arg::with_name(WIDTH)
            .long(WIDTH)
            .short("w")
            .takes_value(true)
            .default_value(width)
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    65_535,
                    "Could not parse image width",
                    "Image width must be between 1 and 65535",
                )
            })
            .help("Width of the output image; the height follows the aspect of the plane"),
        Arg::with_name(LEFTLOWER)
            .long(LEFTLOWER)
            .short("l")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("-2,-2")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
            .help("Left lower corner of the complex plane, as re,im"),
        Arg::with_name(RIGHTUPPER)
            .long(RIGHTUPPER)
            .short("r")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("2,2")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
            .help("Right upper corner of the complex plane, as re,im"),
        Arg::with_name(THREADS)
            .long(THREADS)
            .short("t")
            .takes_value(true)
            .default_value("1")
            .validator(move |s| {
                validate_range(
                    &s,
                    1,
                    max_threads,
                    "Could not parse thread count",
                    &format!("Thread count must be between 1 and {}", max_threads),
                )
            })
            .help("Number of threads to use in solver"),
        Arg::with_name(ITERATIONS)
            .long(ITERATIONS)
            .short("i")
            .takes_value(true)
            .default_value(iterations)
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    200_000,
                    "Could not parse iteration count",
                    "Iteration count must be between 1 and 200000",
                )
            })
            .help("Maximum number of iterations per point"),
    ]
}

fn sweep_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(START)
            .long(START)
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("0")
            .validator(|s| validate_number::<f64>(&s, "Could not parse sweep start"))
            .help("First value of n"),
        Arg::with_name(END)
            .long(END)
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("10")
            .validator(|s| validate_number::<f64>(&s, "Could not parse sweep end"))
            .help("Last value of n"),
        Arg::with_name(STEP)
            .long(STEP)
            .takes_value(true)
            .default_value("0.01")
            .validator(|s| validate_number::<f64>(&s, "Could not parse sweep step"))
            .help("Distance between consecutive values of n"),
    ]
}

fn args() -> ArgMatches<'static> {
    App::new("polybrot")
        .version("0.1.0")
        .about("Escape-time Mandelbrot and polynomial-escape renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(PNG)
                .about("Render z^(-2-1.234i) + c to a single PNG")
                .args(&common_args(STILL_OUTPUT, STILL_WIDTH_STR, STILL_ITERATIONS_STR)),
        )
        .subcommand(
            SubCommand::with_name(GIF)
                .about("Render z^(n+1) + n*z^2 + c for a sweep of n to an animated GIF")
                .args(&common_args(
                    ANIMATION_OUTPUT,
                    ANIMATION_WIDTH_STR,
                    ANIMATION_ITERATIONS_STR,
                ))
                .args(&sweep_args()),
        )
        .get_matches()
}

// clap wants its defaults as strings.
const STILL_WIDTH_STR: &str = "750";
const STILL_ITERATIONS_STR: &str = "100";
const ANIMATION_WIDTH_STR: &str = "250";
const ANIMATION_ITERATIONS_STR: &str = "200";

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))?;
    T::from_str(raw).map_err(|_| format_err!("Could not parse --{} {}", name, raw))
}

fn corner(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))?;
    parse_complex(raw).ok_or_else(|| format_err!("Could not parse --{} {}", name, raw))
}

/// Build a configuration from the shared options, on top of `base`.
fn render_config(matches: &ArgMatches, base: RenderConfig) -> Result<RenderConfig, Error> {
    let config = RenderConfig {
        max_iterations: value(matches, ITERATIONS)?,
        threads: value(matches, THREADS)?,
        ..base
    };
    let config = RenderConfig {
        viewport: polybrot::Viewport {
            width: value(matches, WIDTH)?,
            ..config.viewport
        },
        ..config
    };
    Ok(config.with_corners(corner(matches, LEFTLOWER)?, corner(matches, RIGHTUPPER)?))
}

fn still(matches: &ArgMatches) -> Result<(), Error> {
    let config = render_config(matches, RenderConfig::still())?;
    let output: String = value(matches, OUTPUT)?;
    let plane = config.plane()?;
    let escape = config.escape(EscapeFunction::default())?;
    let frame = polybrot::render(&plane, &escape, &config.scale, config.threads)?;
    sink::write_png(Path::new(&output), &frame)?;
    Ok(())
}

fn animation(matches: &ArgMatches) -> Result<(), Error> {
    let config = render_config(matches, RenderConfig::animation())?;
    let output: String = value(matches, OUTPUT)?;
    let sweep = Sweep::new(value(matches, START)?, value(matches, END)?, value(matches, STEP)?)?;
    let plane = config.plane()?;
    let palette = config.palette();
    let sequence = polybrot::render_sequence(
        &plane,
        config.max_iterations,
        &palette,
        &sweep,
        config.threads,
        |function| println!("calculating f_n(z,c) = {}", function),
    )?;
    info!("encoding {} frames", sequence.len());
    sink::write_gif(Path::new(&output), &sequence, &palette)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    let result = match matches.subcommand() {
        (PNG, Some(matches)) => still(matches),
        (GIF, Some(matches)) => animation(matches),
        (other, _) => Err(format_err!("Unknown command {}", other)),
    };

    if let Err(e) = result {
        eprintln!("polybrot: {}", e);
        std::process::exit(1);
    }
}

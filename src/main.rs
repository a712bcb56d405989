use tracing::info;
use tracing_subscriber::EnvFilter;
use utmconv::{batch::{forward_batch, inverse_batch, ZoneArg}, utm, Ellipsoid, Error};

fn demo_scalar() -> Result<(), Error> {
    let coord = utm::forward(50., -5., None, &Ellipsoid::WGS84)?;
    println!("Scalar: (50, -5) -> {coord}");

    let back = coord.to_latlon()?;
    println!("Scalar back: {coord} -> {back}");

    Ok(())
}

fn demo_list() -> Result<(), Error> {
    let lats = [50., 55., 60., -33.8688];
    let lons = [-5., 10., 5., 151.2093];

    let out = forward_batch(&lats, &lons, None, &Ellipsoid::WGS84)?;
    for i in 0..out.len() {
        println!(
            "List: ({}, {}) -> {} {:.3} {:.3}",
            lats[i], lons[i], out.zones[i], out.eastings[i], out.northings[i],
        );
    }

    let back = inverse_batch(&out.eastings, &out.northings, &out.zones, &Ellipsoid::WGS84)?;
    for i in 0..back.len() {
        println!("List back: {} -> ({:.9}, {:.9})", out.zones[i], back.lats[i], back.lons[i]);
    }

    Ok(())
}

fn demo_forced_zone() -> Result<(), Error> {
    let lats = [50., 55.];
    let lons = [-5., 10.];

    let out = forward_batch(&lats, &lons, Some("30N"), &Ellipsoid::WGS84)?;
    let back = inverse_batch(&out.eastings, &out.northings, ZoneArg::parse_shared("30N")?, &Ellipsoid::WGS84)?;
    for i in 0..out.len() {
        println!(
            "Forced 30N: ({}, {}) -> {:.3} {:.3} -> ({:.9}, {:.9})",
            lats[i], lons[i], out.eastings[i], out.northings[i], back.lats[i], back.lons[i],
        );
    }

    Ok(())
}

fn demo_ellipsoid() -> Result<(), Error> {
    let airy: Ellipsoid = "airy1830".parse()?;
    let coord = utm::forward(50., -5., None, &airy)?;
    println!("{airy}: (50, -5) -> {coord}");

    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("running sample conversions");

    demo_scalar()?;
    demo_list()?;
    demo_forced_zone()?;
    demo_ellipsoid()?;

    if let Err(err) = forward_batch(&[50., 55., 60.], &[-5., -20.], None, &Ellipsoid::WGS84) {
        println!("Expected failure: {err}");
    }

    Ok(())
}

// demos/water_heater.rs

use fixed_ratio_pid::{Config, Controller, Fixed};

/// Thermal model of a tank water heater.
struct WaterHeater {
    water_mass_g: f32,
    r_factor: f32,
    input_temp: f32,
    max_power: f32,
    temp: f32,
    power_fraction: f32,
    flow_rate: f32,
}

impl WaterHeater {
    fn new(water_mass_g: f32, r_factor: f32, input_temp: f32, max_power: f32) -> Self {
        Self {
            water_mass_g,
            r_factor,
            input_temp,
            max_power,
            temp: input_temp,
            power_fraction: 0.0,
            flow_rate: 0.0,
        }
    }

    /// Advances the model by `dt_secs` seconds.
    fn update(&mut self, dt_secs: f32) {
        const SURFACE_AREA_M2: f32 = 2.5;
        const AIR_TEMP: f32 = 20.0;
        const WATER_SPECIFIC_HEAT: f32 = 4.186; // J/g/C

        // Cold water replacing drained hot water.
        let grams_drained = self.flow_rate * dt_secs;
        let delta_drain = grams_drained / self.water_mass_g * (self.input_temp - self.temp);

        // Loss through the tank walls.
        let heat_lost = SURFACE_AREA_M2 * self.r_factor * (self.temp - AIR_TEMP) * dt_secs;
        let delta_air = -heat_lost / self.water_mass_g / WATER_SPECIFIC_HEAT;

        let energy_in = self.power_fraction * self.max_power * dt_secs;
        let delta_heater = energy_in / self.water_mass_g / WATER_SPECIFIC_HEAT;

        self.temp += delta_drain + delta_air + delta_heater;
    }
}

fn main() {
    let mut config = Config::new();

    // Gain and time constants, in seconds.
    config.gain = 15.0;
    config.integral_time = 85.0;
    config.derivative_time = 7.0;

    // Temperatures in Celsius, output in percent of heater power.
    config.setpoint_min = 0.0;
    config.setpoint_max = 100.0;
    config.measurement_min = 0.0;
    config.measurement_max = 100.0;
    config.output_min = 0.0;
    config.output_max = 100.0;

    // One update per minute.
    config.timestep_max = 60.0;

    let mut pid = match Controller::create(config) {
        Ok(pid) => pid,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    println!("kP = {}, kI = {}, kD = {}", pid.kp(), pid.ki(), pid.kd());

    let mut heater = WaterHeater::new(200_000.0, 20.0, 20.0, 11_700.0);
    let setpoint = 54.0;
    pid.set_setpoint(Fixed::from_num(setpoint));

    let dt = 60;
    println!("t,setpoint,temp,output,p,i,d");
    for t in (0..12 * 60 * 60).step_by(dt) {
        // Hot water demand over the day.
        heater.flow_rate = match t {
            t if t > 4 * 3600 && t < 5 * 3600 => 80.0,
            t if t > 5 * 3600 && t < 8 * 3600 => 10.0,
            t if t > 8 * 3600 && t < 9 * 3600 => 4.0 * 80.0,
            _ => 0.0,
        };

        let power = pid.update(Fixed::from_num(heater.temp), Fixed::from_num(dt));
        heater.power_fraction = power.to_num::<f32>() / 100.0;
        heater.update(dt as f32);

        let diagnostics = pid.diagnostics();
        println!(
            "{},{},{:.3},{},{},{},{}",
            t, setpoint, heater.temp, diagnostics.output, diagnostics.p, diagnostics.i, diagnostics.d
        );
    }
}

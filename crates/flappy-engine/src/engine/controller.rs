/// Number of sensor readings a controller receives each tick.
///
/// In order: the bird's height, its distance to the target pipe's top edge,
/// and its distance to the target pipe's bottom edge.
pub const SENSOR_COUNT: usize = 3;

/// Decision-maker driving one bird.
///
/// The harness calls [`activate`](Self::activate) once per tick with
/// [`SENSOR_COUNT`] readings and interprets `outputs[0] > 0` as a jump. Any
/// further outputs are ignored.
///
/// Shapes are checked when a batch starts: `input_len` must equal
/// [`SENSOR_COUNT`] and `output_len` must be at least one.
pub trait Controller {
    fn input_len(&self) -> usize;
    fn output_len(&self) -> usize;
    fn activate(&self, inputs: &[f32], outputs: &mut [f32]);
}

impl<C> Controller for &C
where
    C: Controller + ?Sized,
{
    fn input_len(&self) -> usize {
        (**self).input_len()
    }

    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn activate(&self, inputs: &[f32], outputs: &mut [f32]) {
        (**self).activate(inputs, outputs);
    }
}

impl<C> Controller for Box<C>
where
    C: Controller + ?Sized,
{
    fn input_len(&self) -> usize {
        (**self).input_len()
    }

    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn activate(&self, inputs: &[f32], outputs: &mut [f32]) {
        (**self).activate(inputs, outputs);
    }
}

/// Adapts a closure mapping sensor readings to a single output.
#[derive(Debug, Clone, Copy)]
pub struct FnController<F> {
    f: F,
}

impl<F> FnController<F>
where
    F: Fn(&[f32]) -> f32,
{
    pub const fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Controller for FnController<F>
where
    F: Fn(&[f32]) -> f32,
{
    fn input_len(&self) -> usize {
        SENSOR_COUNT
    }

    fn output_len(&self) -> usize {
        1
    }

    fn activate(&self, inputs: &[f32], outputs: &mut [f32]) {
        outputs[0] = (self.f)(inputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_controller_writes_first_output() {
        let controller = FnController::new(|inputs: &[f32]| inputs[1] - inputs[2]);
        let mut outputs = [0.0];
        controller.activate(&[350.0, 10.0, 4.0], &mut outputs);
        assert_eq!(outputs, [6.0]);
        assert_eq!(controller.input_len(), SENSOR_COUNT);
        assert_eq!(controller.output_len(), 1);
    }

    #[test]
    fn test_boxed_controllers_are_controllers() {
        let controllers: Vec<Box<dyn Controller>> = vec![
            Box::new(FnController::new(|_: &[f32]| 1.0)),
            Box::new(FnController::new(|_: &[f32]| -1.0)),
        ];
        let mut outputs = [0.0];
        let results: Vec<f32> = controllers
            .iter()
            .map(|c| {
                c.activate(&[0.0; SENSOR_COUNT], &mut outputs);
                outputs[0]
            })
            .collect();
        assert_eq!(results, [1.0, -1.0]);
    }
}

//! Arithmetic tools - add, subtract, multiply, divide
//!
//! Each tool takes two numeric arguments `a` and `b`. Integral results are
//! rendered without a fractional part ("15", not "15.0").

use async_trait::async_trait;

use super::{Tool, ToolArgs, ToolError};

fn operands(args: &ToolArgs) -> Result<(f64, f64), ToolError> {
    Ok((args.number::<f64>("a")?, args.number::<f64>("b")?))
}

fn render(value: f64) -> Result<String, ToolError> {
    if !value.is_finite() {
        return Err(ToolError::Failed(format!("result is not a finite number: {}", value)));
    }
    // f64 Display never uses exponent notation and drops ".0"
    if value == 0.0 {
        return Ok("0".to_string());
    }
    Ok(value.to_string())
}

pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two numbers. Arguments: a, b."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let (a, b) = operands(args)?;
        render(a + b)
    }
}

pub struct SubtractTool;

#[async_trait]
impl Tool for SubtractTool {
    fn name(&self) -> &str {
        "subtract"
    }

    fn description(&self) -> &str {
        "Subtract b from a. Arguments: a, b."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let (a, b) = operands(args)?;
        render(a - b)
    }
}

pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two numbers. Arguments: a, b."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let (a, b) = operands(args)?;
        render(a * b)
    }
}

pub struct DivideTool;

#[async_trait]
impl Tool for DivideTool {
    fn name(&self) -> &str {
        "divide"
    }

    fn description(&self) -> &str {
        "Divide a by b. Arguments: a, b (b must not be zero)."
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let (a, b) = operands(args)?;
        if b == 0.0 {
            return Err(ToolError::Failed("division by zero".to_string()));
        }
        render(a / b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab(a: &str, b: &str) -> ToolArgs {
        ToolArgs::new().with("a", a).with("b", b)
    }

    #[tokio::test]
    async fn test_add_integers() {
        assert_eq!(AddTool.execute(&ab("10", "5")).await.unwrap(), "15");
    }

    #[tokio::test]
    async fn test_multiply_integers() {
        assert_eq!(MultiplyTool.execute(&ab("15", "3")).await.unwrap(), "45");
    }

    #[tokio::test]
    async fn test_subtract_negative_result() {
        assert_eq!(SubtractTool.execute(&ab("3", "10")).await.unwrap(), "-7");
    }

    #[tokio::test]
    async fn test_divide_fractional() {
        assert_eq!(DivideTool.execute(&ab("5", "2")).await.unwrap(), "2.5");
    }

    #[tokio::test]
    async fn test_divide_by_zero() {
        let err = DivideTool.execute(&ab("1", "0")).await.unwrap_err();
        assert_eq!(err, ToolError::Failed("division by zero".to_string()));
    }

    #[tokio::test]
    async fn test_zero_result_has_no_sign() {
        assert_eq!(MultiplyTool.execute(&ab("-1", "0")).await.unwrap(), "0");
    }

    #[tokio::test]
    async fn test_missing_operand() {
        let err = AddTool.execute(&ToolArgs::new().with("a", "1")).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { ref name } if name == "b"));
    }

    #[tokio::test]
    async fn test_non_numeric_operand() {
        let err = AddTool.execute(&ab("ten", "5")).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { ref name, .. } if name == "a"));
    }

    #[tokio::test]
    async fn test_overflow_is_error() {
        let err = MultiplyTool.execute(&ab("1e308", "10")).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
    }
}
